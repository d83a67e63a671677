//! Clusterseek – the query layer of a gene cluster catalog search.
//!
//! A free-form or structured search string is turned into a boolean
//! combination of category-filtered record sets:
//! * A [`query::Clause`] is one `(category, term, operation)` unit, produced
//!   either from the bracketed `[category:operation]term` syntax or by
//!   classifying bare tokens against the catalog.
//! * The [`engine::Engine`] resolves every clause to a set of
//!   [`catalog::RecordId`] (kept in roaring treemaps), folds the sets
//!   together in clause order, pages the sorted result and aggregates
//!   grouped statistics over the full set.
//! * The [`catalog::Catalog`] is the sole persistence boundary: a SQLite
//!   store holding clusters, sequences, taxa, compounds and monomers, with
//!   prepared statements for loading and term classification.
//!
//! ## Modules
//! * [`catalog`] – SQLite catalog store: schema, loaders, classification
//!   probes and query execution.
//! * [`query`] – Sanitizer, search-string parsers and the term classifier.
//! * [`engine`] – Category dispatch, set combination, paging, statistics
//!   and the search entry point.
//! * [`terms`] – Static registry backing per-category autocompletion.
//! * [`interface`] – Thread-per-search runner with cooperative cancellation.
//!
//! ## Quick Start
//! ```
//! use rusqlite::Connection;
//! use clusterseek::{catalog::{Catalog, Lineage}, engine::Engine};
//! let conn = Connection::open_in_memory().unwrap();
//! let mut catalog = Catalog::new(&conn).unwrap();
//! catalog.add_taxon(1, &Lineage {
//!     genus: "Streptomyces".into(),
//!     species: "Streptomyces coelicolor".into(),
//!     phylum: "Actinobacteria".into(),
//!     ..Default::default()
//! }).unwrap();
//! catalog.add_sequence(1, "AB123456", 1).unwrap();
//! catalog.add_cluster(1, 1, 0, 25000).unwrap();
//! catalog.add_cluster_type(1, "lanthipeptide", "Lanthipeptide cluster").unwrap();
//! catalog.assign_cluster_type(1, 1).unwrap();
//! let mut engine = Engine::new(&mut catalog);
//! let result = engine.search("[type]lanthipeptide [genus]Streptomyces", 0, 0).unwrap();
//! assert_eq!(result.total, 1);
//! assert_eq!(result.clusters, vec![1]);
//! ```
//!
//! ## Scope
//! The engine orders results by identity, not relevance; there is no
//! scoring, no stemming and no caching across calls. Turning the returned
//! identities into presentable records (JSON, CSV) is left to the callers
//! downstream.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod interface;
pub mod query;
pub mod terms;
