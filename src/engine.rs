use core::hash::BuildHasherDefault;
use std::collections::HashMap;

use lazy_static::lazy_static;
use roaring::RoaringTreemap;
use rusqlite::params;
use seahash::SeaHasher;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, GroupedCounts, RecordId};
use crate::error::Result;
use crate::query::{Operation, parse_search_string, parse_simple_search, sanitise_string};

// category names hash often enough that the default hasher is a waste
pub type OtherHasher = BuildHasherDefault<SeaHasher>;

/// How a category's term is matched against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// The term is used verbatim.
    Exact,
    /// The term is wrapped in `%term%` wildcards.
    Fuzzy,
    /// Exact match on the primary field, substring fallback on a description.
    ExactOrDescription,
}

type CategoryTable = HashMap<&'static str, &'static str, OtherHasher>;

lazy_static! {
    static ref FUZZY_CATEGORIES: CategoryTable = {
        let mut table = CategoryTable::default();
        table.insert(
            "acc",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                where s.Accession like ?",
        );
        table.insert(
            "superkingdom",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Superkingdom like ?",
        );
        table.insert(
            "phylum",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Phylum like ?",
        );
        table.insert(
            "class",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Class like ?",
        );
        table.insert(
            "order",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Taxonomic_Order like ?",
        );
        table.insert(
            "family",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Family like ?",
        );
        table.insert(
            "species",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Species like ?",
        );
        table.insert(
            "strain",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Strain like ?",
        );
        table.insert(
            "compound",
            "select Cluster_Identity
                from Compound
                where Name like ?",
        );
        table.insert(
            "compound_seq",
            "select Cluster_Identity
                from Compound
                where Peptide_Sequence like ?",
        );
        table
    };
    static ref EXACT_CATEGORIES: CategoryTable = {
        let mut table = CategoryTable::default();
        table.insert(
            "genus",
            "select c.Cluster_Identity
                from Cluster c
                join Sequence s
                on s.Sequence_Identity = c.Sequence_Identity
                join Taxon t
                on t.Taxon_Identity = s.Taxon_Identity
                where t.Genus = ? collate nocase",
        );
        table.insert(
            "monomer",
            "select cm.Cluster_Identity
                from Cluster_Monomer cm
                join Monomer m
                on m.Monomer_Identity = cm.Monomer_Identity
                where m.Name = ? collate nocase",
        );
        table
    };
    static ref EXACT_OR_DESCRIPTION_CATEGORIES: CategoryTable = {
        let mut table = CategoryTable::default();
        table.insert(
            "type",
            "select ct.Cluster_Identity
                from Cluster_ClusterType ct
                join ClusterType t
                on t.ClusterType_Identity = ct.ClusterType_Identity
                where t.Term = ? collate nocase
                or t.Description like ?",
        );
        table
    };
}

const SUMMARY_TYPES: &str = "select t.Term,
        count(distinct ct.Cluster_Identity)
    from Cluster_ClusterType ct
    join ClusterType t
    on t.ClusterType_Identity = ct.ClusterType_Identity
    where ct.Cluster_Identity in ({ids})
    group by t.Term
    order by count(distinct ct.Cluster_Identity) desc, t.Term";

const SUMMARY_PHYLUM: &str = "select t.Phylum,
        count(c.Cluster_Identity)
    from Cluster c
    join Sequence s
    on s.Sequence_Identity = c.Sequence_Identity
    join Taxon t
    on t.Taxon_Identity = s.Taxon_Identity
    where c.Cluster_Identity in ({ids})
    group by t.Phylum
    order by count(c.Cluster_Identity) desc, t.Phylum";

/// Pick the lookup strategy for a category name by probing the dispatch
/// tables in fixed order. An unregistered category is a first-class miss.
fn lookup_for(category: &str) -> Option<(LookupStrategy, &'static str)> {
    if let Some(sql) = FUZZY_CATEGORIES.get(category) {
        return Some((LookupStrategy::Fuzzy, *sql));
    }
    if let Some(sql) = EXACT_CATEGORIES.get(category) {
        return Some((LookupStrategy::Exact, *sql));
    }
    if let Some(sql) = EXACT_OR_DESCRIPTION_CATEGORIES.get(category) {
        return Some((LookupStrategy::ExactOrDescription, *sql));
    }
    None
}

/// Grouped statistics over a full (unpaged) result set. Both sub-blocks are
/// omitted entirely when the result set was empty.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatsBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters_by_type: Option<GroupedCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters_by_phylum: Option<GroupedCounts>,
}

/// What a search hands back: the size of the full result set, statistics
/// over all of it, and one page of cluster identities in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub total: u64,
    pub stats: StatsBlock,
    pub clusters: Vec<RecordId>,
}

/// Slice a sorted identity set by offset and limit. A limit of zero means
/// "everything from the offset on", and an offset past the end is just an
/// empty page.
pub fn page(sorted: &RoaringTreemap, offset: usize, limit: usize) -> Vec<RecordId> {
    let take = if limit == 0 { usize::MAX } else { limit };
    sorted.iter().skip(offset).take(take).collect()
}

// ------------- Engine -------------
pub struct Engine<'db, 'en> {
    catalog: &'en mut Catalog<'db>,
}
impl<'db, 'en> Engine<'db, 'en> {
    pub fn new(catalog: &'en mut Catalog<'db>) -> Self {
        Self { catalog }
    }

    /// Search for clusters specified by the given search string.
    ///
    /// The presence of `[` selects the structured syntax; otherwise each
    /// token is classified individually. Every clause resolves to a set of
    /// cluster identities and the sets are folded together in clause order.
    pub fn search(&mut self, search_string: &str, offset: usize, limit: usize) -> Result<SearchResult> {
        let parsed = if search_string.contains('[') {
            parse_search_string(search_string)
        } else {
            parse_simple_search(self.catalog, search_string)?
        };

        let mut collected_sets = Vec::with_capacity(parsed.len());
        let mut all_clusters = RoaringTreemap::new();
        for entry in &parsed {
            let found_clusters = self.resolve(&entry.category, &entry.term)?;
            all_clusters |= &found_clusters;
            collected_sets.push(found_clusters);
        }

        // The final set starts out as the union of every clause's result,
        // not as the first clause's result. A leading intersection therefore
        // runs against everything the other clauses contributed, and a lone
        // `not` clause empties the set. Callers depend on these semantics,
        // so the seeding must not change.
        let mut final_set = all_clusters;
        for (entry, result) in parsed.iter().zip(&collected_sets) {
            match entry.operation {
                Operation::Or => final_set |= result,
                Operation::Not => final_set -= result,
                Operation::And => final_set &= result,
            }
        }

        let total = final_set.len();
        let stats = self.calculate_stats(&final_set)?;
        let clusters = page(&final_set, offset, limit);
        info!(total, clauses = parsed.len(), returned = clusters.len(), "search complete");
        Ok(SearchResult {
            total,
            stats,
            clusters,
        })
    }

    /// Resolve one category/term pair to the set of matching cluster
    /// identities. Unknown categories silently produce no matches.
    pub fn resolve(&self, category: &str, term: &str) -> Result<RoaringTreemap> {
        let term = sanitise_string(term);
        let found_clusters = match lookup_for(&sanitise_string(category)) {
            None => RoaringTreemap::new(),
            Some((LookupStrategy::Fuzzy, sql)) => self
                .catalog
                .clusters_where(sql, params![format!("%{}%", term)])?,
            Some((LookupStrategy::Exact, sql)) => self.catalog.clusters_where(sql, params![term])?,
            Some((LookupStrategy::ExactOrDescription, sql)) => self
                .catalog
                .clusters_where(sql, params![term, format!("%{}%", term)])?,
        };
        debug!(category, %term, found = found_clusters.len(), "category resolved");
        Ok(found_clusters)
    }

    /// Calculate some stats on the search results: clusters grouped by type
    /// term and by phylum, over the whole result set regardless of paging.
    pub fn calculate_stats(&self, clusters: &RoaringTreemap) -> Result<StatsBlock> {
        if clusters.is_empty() {
            return Ok(StatsBlock::default());
        }
        Ok(StatsBlock {
            clusters_by_type: Some(self.catalog.grouped_count(SUMMARY_TYPES, clusters)?),
            clusters_by_phylum: Some(self.catalog.grouped_count(SUMMARY_PHYLUM, clusters)?),
        })
    }
}
