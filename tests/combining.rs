use clusterseek::catalog::{Catalog, Lineage};
use clusterseek::engine::Engine;
use rusqlite::Connection;

// Categories producing the sets from the combiner contract:
// alpha resolves to {1, 2, 3} and beta to {2, 3, 4}.
fn setup() -> Catalog<'static> {
    let conn = Box::leak(Box::new(Connection::open_in_memory().unwrap()));
    let mut catalog = Catalog::new(conn).unwrap();
    catalog
        .add_taxon(
            1,
            &Lineage {
                superkingdom: "Bacteria".into(),
                phylum: "Actinobacteria".into(),
                genus: "Streptomyces".into(),
                species: "Streptomyces coelicolor".into(),
                ..Default::default()
            },
        )
        .unwrap();
    catalog.add_sequence(1, "AB123456", 1).unwrap();
    for cluster in 1..=4 {
        catalog.add_cluster(cluster, 1, 0, 10000).unwrap();
    }
    catalog.add_cluster_type(1, "alpha", "first test type").unwrap();
    catalog.add_cluster_type(2, "beta", "second test type").unwrap();
    for cluster in [1, 2, 3] {
        catalog.assign_cluster_type(cluster, 1).unwrap();
    }
    for cluster in [2, 3, 4] {
        catalog.assign_cluster_type(cluster, 2).unwrap();
    }
    catalog
}

#[test]
fn and_then_not_starts_from_the_union() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    // final = ((A ∪ B) ∩ A) − B = {1}
    let result = engine.search("[type]alpha [type:not]beta", 0, 0).unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.clusters, vec![1]);
}

#[test]
fn a_lone_not_clause_empties_the_set() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    // The union seed is exactly the clause's own set, so subtracting it
    // leaves nothing. This pins the union-seed behavior explicitly.
    let result = engine.search("[type:not]alpha", 0, 0).unwrap();
    assert_eq!(result.total, 0);
    assert!(result.clusters.is_empty());
}

#[test]
fn or_unions_both_sets() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    let result = engine.search("[type]alpha [type:or]beta", 0, 0).unwrap();
    assert_eq!(result.clusters, vec![1, 2, 3, 4]);
}

#[test]
fn two_and_clauses_intersect() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    let result = engine.search("[type]alpha [type]beta", 0, 0).unwrap();
    assert_eq!(result.clusters, vec![2, 3]);
}

#[test]
fn not_then_and_differs_from_and_then_not() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    // final = ((A ∪ B) − B) ∩ A = {1} here as well, but via a different
    // path; clause order is what the combiner folds over.
    let result = engine.search("[type:not]beta [type]alpha", 0, 0).unwrap();
    assert_eq!(result.clusters, vec![1]);
}

#[test]
fn results_are_sorted_ascending_by_identity() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    let result = engine.search("[type]beta", 0, 0).unwrap();
    assert_eq!(result.clusters, vec![2, 3, 4]);
}

#[test]
fn unknown_category_produces_no_matches() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    let result = engine.search("[bogus]whatever", 0, 0).unwrap();
    assert_eq!(result.total, 0);
    assert!(result.clusters.is_empty());
}

#[test]
fn unknown_category_resolution_is_not_an_error() {
    let mut catalog = setup();
    let engine = Engine::new(&mut catalog);
    let found = engine.resolve("no_such_category", "term").unwrap();
    assert!(found.is_empty());
}

#[test]
fn empty_search_returns_an_empty_result() {
    let mut catalog = setup();
    let mut engine = Engine::new(&mut catalog);
    let result = engine.search("", 0, 0).unwrap();
    assert_eq!(result.total, 0);
    assert!(result.clusters.is_empty());
    assert!(result.stats.clusters_by_type.is_none());
    assert!(result.stats.clusters_by_phylum.is_none());

    let result = engine.search("   \t ", 0, 0).unwrap();
    assert_eq!(result.total, 0);
}

#[test]
fn fuzzy_category_matches_substrings() {
    let mut catalog = setup();
    let engine = Engine::new(&mut catalog);
    // acc is registered fuzzy, so a fragment of the accession matches
    let found = engine.resolve("acc", "B1234").unwrap();
    assert_eq!(found.len(), 4);
}

#[test]
fn exact_category_does_not_match_substrings() {
    let mut catalog = setup();
    let engine = Engine::new(&mut catalog);
    assert!(engine.resolve("genus", "Streptomy").unwrap().is_empty());
    assert_eq!(engine.resolve("genus", "streptomyces").unwrap().len(), 4);
}

#[test]
fn type_falls_back_to_description_substring() {
    let mut catalog = setup();
    let engine = Engine::new(&mut catalog);
    // no type is named "second", but beta's description contains it
    let found = engine.resolve("type", "second").unwrap();
    assert_eq!(found.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
}
