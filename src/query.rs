//! Search-query assembly for the forge's issue search.
//!
//! A query is a sequence of `key:value` clauses joined by spaces. A clause
//! whose key or any value part is empty is dropped as a whole, so optional
//! inputs (an unset label, a missing date) silently narrow nothing.

use log::debug;

/// Ordered collection of `key:value` search clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<String>,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Query::default()
    }

    /// Append `key:part1part2...` unless the clause is incomplete.
    ///
    /// Parts are concatenated without a separator; range separators such as
    /// `".."` must be passed as their own part.
    pub fn clause(mut self, key: &str, parts: &[&str]) -> Self {
        if parts.is_empty() {
            debug!("not enough to form a query clause: [{}]", key);
            return self;
        }
        if key.is_empty() || parts.iter().any(|part| part.is_empty()) {
            debug!("dropping incomplete query clause {}: {:?}", key, parts);
            return self;
        }

        self.clauses.push(format!("{}:{}", key, parts.concat()));
        self
    }

    /// Surviving clauses in insertion order
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.clauses.join(" "))
    }
}

/// Builds a query string from `(key, parts)` pairs.
///
/// # Example
/// ```
/// # use chrn::query::build_query;
/// assert_eq!(build_query(&[("label", &["bug"])]), "label:bug");
/// assert_eq!(build_query(&[("repo", &[""])]), "");
/// ```
pub fn build_query(pairs: &[(&str, &[&str])]) -> String {
    pairs
        .iter()
        .fold(Query::new(), |query, (key, parts)| query.clause(key, parts))
        .to_string()
}
