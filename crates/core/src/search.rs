//! Search-query classification for the unified lead search.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API layer and any future CLI or worker tooling.

use std::sync::OnceLock;

use regex::Regex;

/// Queries shorter than this (after trimming) never reach the stores.
pub const MIN_QUERY_LEN: usize = 2;

/// How a free-text query should be matched against the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Too short to search. The caller returns an empty result set without
    /// issuing any store request.
    TooShort,
    /// Digits, spaces, and an optional leading `+`: match as a phone
    /// substring on both stores.
    Phone(String),
    /// Anything else: match property name/surname/address and call name.
    Text(String),
}

/// Classify a raw operator query.
///
/// The input is trimmed first; classification runs on the trimmed value.
pub fn classify_query(raw: &str) -> SearchQuery {
    let query = raw.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return SearchQuery::TooShort;
    }

    if phone_pattern().is_match(query) {
        SearchQuery::Phone(query.to_string())
    } else {
        SearchQuery::Text(query.to_string())
    }
}

/// A query is phone-like when it consists of digits and spaces, optionally
/// prefixed with `+`.
fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9\s]+$").expect("phone pattern must compile"))
}
