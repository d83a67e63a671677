//! Autocomplete support: a static registry from category name to the
//! distinct-value prefix query that lists available terms for it. The
//! registry is built once at first use and never changes afterwards.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::engine::OtherHasher;
use crate::error::Result;
use crate::query::sanitise_string;

lazy_static! {
    static ref AVAILABLE: HashMap<&'static str, &'static str, OtherHasher> = {
        let mut table = HashMap::<&'static str, &'static str, OtherHasher>::default();
        table.insert(
            "superkingdom",
            "select distinct Superkingdom from Taxon where Superkingdom like ?",
        );
        table.insert(
            "phylum",
            "select distinct Phylum from Taxon where Phylum like ?",
        );
        table.insert(
            "class",
            "select distinct Class from Taxon where Class like ?",
        );
        table.insert(
            "order",
            "select distinct Taxonomic_Order from Taxon where Taxonomic_Order like ?",
        );
        table.insert(
            "family",
            "select distinct Family from Taxon where Family like ?",
        );
        table.insert(
            "genus",
            "select distinct Genus from Taxon where Genus like ?",
        );
        table.insert(
            "species",
            "select distinct Species from Taxon where Species like ?",
        );
        table.insert(
            "strain",
            "select distinct Strain from Taxon where Strain like ?",
        );
        table.insert(
            "acc",
            "select distinct Accession from Sequence where Accession like ?",
        );
        // Suggesting compound names keeps the list in step with the search
        // category, which matches on Compound.Name as well.
        table.insert(
            "compound",
            "select distinct Name from Compound where Name like ?",
        );
        table.insert(
            "monomer",
            "select distinct Name from Monomer where Name like ?",
        );
        table.insert(
            "type",
            "select distinct Term from ClusterType where Term like ?",
        );
        table
    };
}

/// List all available terms for a category that start with the given prefix.
/// Both inputs are sanitised before they reach the catalog; a category
/// without a registered handler yields an empty list rather than an error.
pub fn available_terms(catalog: &Catalog, category: &str, prefix: &str) -> Result<Vec<String>> {
    let cleaned_category = sanitise_string(category);
    let cleaned_prefix = sanitise_string(prefix);
    match AVAILABLE.get(cleaned_category.as_str()) {
        Some(sql) => catalog.distinct_terms(sql, &cleaned_prefix),
        None => Ok(Vec::new()),
    }
}
