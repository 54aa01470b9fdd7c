//! Partition extracted attribute names by lexical shape

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static WORD_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Letters around a single apostrophe, e.g. `kid's`
static APOSTROPHE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]*'[A-Za-z]*$").unwrap());

static LETTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").unwrap());

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").unwrap());

/// Validity bucket for one attribute token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeBucket {
    /// Looks like a real column name
    Alphabetical,
    /// Letters mixed with punctuation: SQL fragments around a real name
    AlphabeticalAndNonNumeric,
    /// No letters at all
    NonAlphabetic,
    NotSorted,
}

/// Decide the bucket for one token. Rules apply in order.
pub fn classify_attribute(token: &str) -> AttributeBucket {
    let has_letter = LETTER_RE.is_match(token);

    if WORD_TOKEN_RE.is_match(token) || (has_letter && APOSTROPHE_TOKEN_RE.is_match(token)) {
        AttributeBucket::Alphabetical
    } else if has_letter && NON_WORD_RE.is_match(token) {
        AttributeBucket::AlphabeticalAndNonNumeric
    } else if !has_letter {
        AttributeBucket::NonAlphabetic
    } else {
        AttributeBucket::NotSorted
    }
}

/// The global attribute vocabulary split into four disjoint buckets, each
/// sorted lexicographically
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeClassification {
    pub alphabetical_attributes: Vec<String>,
    pub alphabetical_and_non_numeric: Vec<String>,
    pub non_alphabetic: Vec<String>,
    pub not_sorted: Vec<String>,
}

impl AttributeClassification {
    pub fn total(&self) -> usize {
        self.alphabetical_attributes.len()
            + self.alphabetical_and_non_numeric.len()
            + self.non_alphabetic.len()
            + self.not_sorted.len()
    }
}

/// Classify every distinct token in `vocabulary`.
pub fn classify_attributes<'a>(vocabulary: impl IntoIterator<Item = &'a String>) -> AttributeClassification {
    let mut result = AttributeClassification::default();

    for token in vocabulary {
        let bucket = match classify_attribute(token) {
            AttributeBucket::Alphabetical => &mut result.alphabetical_attributes,
            AttributeBucket::AlphabeticalAndNonNumeric => &mut result.alphabetical_and_non_numeric,
            AttributeBucket::NonAlphabetic => &mut result.non_alphabetic,
            AttributeBucket::NotSorted => &mut result.not_sorted,
        };
        bucket.push(token.clone());
    }

    for bucket in [
        &mut result.alphabetical_attributes,
        &mut result.alphabetical_and_non_numeric,
        &mut result.non_alphabetic,
        &mut result.not_sorted,
    ] {
        bucket.sort();
        bucket.dedup();
    }

    result
}
