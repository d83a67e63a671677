use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::Catalog;
use crate::error::Result;

/// How one clause combines with the rest of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    And,
    Or,
    Not,
}

impl Operation {
    // Anything that is not a literal lowercase "or"/"not" combines as an
    // intersection, which is also the default when no operation is given.
    fn from_word(word: &str) -> Self {
        match word {
            "or" => Operation::Or,
            "not" => Operation::Not,
            _ => Operation::And,
        }
    }
}

/// One parsed (category, term, operation) unit of a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub category: String,
    pub term: String,
    pub operation: Operation,
}

/// Remove all non-whitelisted characters from the search string.
///
/// Everything outside {A-Z, a-z, 0-9, `_`, `-`, `(`, `)`, space} is dropped,
/// which keeps wildcard and quoting characters out of the catalog lookups.
///
/// ```
/// use clusterseek::query::sanitise_string;
/// assert_eq!(sanitise_string("fOo"), "fOo");
/// assert_eq!(sanitise_string("%bar"), "bar");
/// ```
pub fn sanitise_string(search_string: &str) -> String {
    search_string
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '(' | ')' | ' '))
        .collect()
}

lazy_static! {
    static ref CLAUSE_PATTERN: Regex =
        Regex::new(r"\[([A-Za-z0-9_]+)(:[A-Za-z0-9_]+)?\]([A-Za-z0-9_]+)").unwrap();
}

/// Parse a search string with explicit categories.
///
/// Given a search string like `[fieldname1]searchterm1 [fieldname2]searchterm2`,
/// return the parsed clauses. Optionally the fieldname can be followed by
/// `:OP`, where OP is either `and`, `or` or `not`. Anything that is not a
/// well-formed bracketed clause is skipped without complaint.
///
/// ```
/// use clusterseek::query::{parse_search_string, Operation};
/// let parsed = parse_search_string("[type]lanthipeptide [genus]Streptomyces");
/// assert_eq!(parsed.len(), 2);
/// assert_eq!(parsed[0].category, "type");
/// assert_eq!(parsed[0].term, "lanthipeptide");
/// assert_eq!(parsed[0].operation, Operation::And);
/// assert_eq!(parsed[1].category, "genus");
/// assert_eq!(parsed[1].term, "Streptomyces");
/// ```
pub fn parse_search_string(search_string: &str) -> Vec<Clause> {
    let mut parsed = Vec::new();
    for captures in CLAUSE_PATTERN.captures_iter(search_string) {
        let operation = match captures.get(2) {
            Some(op) => Operation::from_word(&op.as_str()[1..]),
            None => Operation::And,
        };
        parsed.push(Clause {
            category: captures[1].to_string(),
            term: captures[3].to_string(),
            operation,
        });
    }
    parsed
}

/// Parse a search string that doesn't specify categories.
///
/// Each whitespace-separated token is sanitised and then classified against
/// the catalog, always combining with [`Operation::And`]. Simple searches
/// cannot express or/not.
pub fn parse_simple_search(catalog: &mut Catalog, search_string: &str) -> Result<Vec<Clause>> {
    let mut parsed = Vec::new();
    for token in search_string.split_whitespace() {
        let term = sanitise_string(token);
        parsed.push(classify(catalog, &term)?);
    }
    Ok(parsed)
}

/// Classify one bare token by probing the catalog in fixed priority order:
/// cluster type, accession, genus, species, monomer. The first probe that
/// answers wins and its canonical value replaces the raw token. Tokens
/// matching nothing fall back to a compound sequence search, so a token
/// always classifies to something.
///
/// The order is deliberate: structured biological identifiers take
/// precedence over generic text before raw sequence matching kicks in.
pub fn classify(catalog: &mut Catalog, token: &str) -> Result<Clause> {
    if let Some(term) = catalog.canonical_type(token)? {
        return Ok(clause_for("type", term));
    }
    if let Some(term) = catalog.canonical_accession(token)? {
        return Ok(clause_for("acc", term));
    }
    if let Some(term) = catalog.canonical_genus(token)? {
        return Ok(clause_for("genus", term));
    }
    if let Some(term) = catalog.canonical_species(token)? {
        return Ok(clause_for("species", term));
    }
    if let Some(term) = catalog.canonical_monomer(token)? {
        return Ok(clause_for("monomer", term));
    }
    Ok(clause_for("compound_seq", token.to_string()))
}

fn clause_for(category: &str, term: String) -> Clause {
    Clause {
        category: category.to_string(),
        term,
        operation: Operation::And,
    }
}
