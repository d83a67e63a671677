use clusterseek::query::{Operation, parse_search_string, sanitise_string};

#[test]
fn structured_parse_defaults_to_and() {
    let parsed = parse_search_string("[type]lanthipeptide [genus]Streptomyces");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].category, "type");
    assert_eq!(parsed[0].term, "lanthipeptide");
    assert_eq!(parsed[0].operation, Operation::And);
    assert_eq!(parsed[1].category, "genus");
    assert_eq!(parsed[1].term, "Streptomyces");
    assert_eq!(parsed[1].operation, Operation::And);
}

#[test]
fn structured_parse_with_operations() {
    let parsed = parse_search_string("[genus:and]Streptomyces [type:or]ripp [type:not]lasso");
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].operation, Operation::And);
    assert_eq!(parsed[1].category, "type");
    assert_eq!(parsed[1].term, "ripp");
    assert_eq!(parsed[1].operation, Operation::Or);
    assert_eq!(parsed[2].term, "lasso");
    assert_eq!(parsed[2].operation, Operation::Not);
}

#[test]
fn clauses_keep_input_order() {
    let parsed = parse_search_string("[b]two [a]one [c]three");
    let categories: Vec<&str> = parsed.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(categories, vec!["b", "a", "c"]);
}

#[test]
fn malformed_fragments_are_skipped() {
    // Only the well-formed bracketed clause survives; the rest is dropped
    // without raising anything.
    let parsed = parse_search_string("hello [type]lasso world [broken [:]x ]y[");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].category, "type");
    assert_eq!(parsed[0].term, "lasso");
}

#[test]
fn operation_words_are_case_sensitive() {
    // Uppercase or unknown operation words fall back to an intersection.
    let parsed = parse_search_string("[type:NOT]lasso [type:xor]ripp [type:not]thio");
    assert_eq!(parsed[0].operation, Operation::And);
    assert_eq!(parsed[1].operation, Operation::And);
    assert_eq!(parsed[2].operation, Operation::Not);
}

#[test]
fn empty_input_parses_to_nothing() {
    assert!(parse_search_string("").is_empty());
    assert!(parse_search_string("no brackets here").is_empty());
}

#[test]
fn sanitise_keeps_whitelisted_characters() {
    assert_eq!(sanitise_string("fOo"), "fOo");
    assert_eq!(sanitise_string("%bar"), "bar");
    assert_eq!(sanitise_string("A3(2) str_JA-46"), "A3(2) str_JA-46");
    assert_eq!(sanitise_string("'; drop table Cluster; --"), " drop table Cluster --");
    assert_eq!(sanitise_string(""), "");
}

#[test]
fn sanitise_is_idempotent() {
    let samples = [
        "Streptomyces coelicolor A3(2)",
        "%_wild*card?",
        "tabs\tand\nnewlines",
        "ünïcödé",
        "[type:not]lasso",
    ];
    for s in &samples {
        let once = sanitise_string(s);
        assert_eq!(sanitise_string(&once), once, "not idempotent for {s:?}");
    }
}
