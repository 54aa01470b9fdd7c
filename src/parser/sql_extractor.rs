//! Best-effort lexical extraction of tables, attributes and CASE descriptions
//!
//! This is deliberately not a SQL parser. The patterns below are applied to
//! the raw command text and have known blind spots that the summary output
//! depends on staying stable across runs over historical data:
//!
//! - only tables introduced by an explicit `FROM` are found, `JOIN` targets
//!   are not;
//! - the select list is split on every comma, so commas nested inside
//!   function calls split a clause in two;
//! - subqueries contribute their own `SELECT ... FROM` spans and `FROM`
//!   tokens, including keywords such as `SELECT` or `JSON_EACH` that follow
//!   a `FROM` (those are quarantined later, see `model::quarantine`).

use std::sync::LazyLock;

use regex::Regex;

/// Marker emitted for any select-list clause containing `*`.
pub const WILDCARD_ATTRIBUTE: &str = "* (all columns returned)";

/// Prefix applied to every captured `CASE WHEN ... END` body.
pub const CASE_DESCRIPTION_PREFIX: &str = "description: ";

/// `FROM <word>`
static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FROM\s+(\w+)").unwrap());

/// Shortest span between `SELECT` and the next `FROM`, across newlines.
static SELECT_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)SELECT\s+(.*?)\s+FROM").unwrap());

static AS_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAS\b").unwrap());

static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAS\s+(\w+)").unwrap());

/// Computed columns that are not real attributes when left unaliased.
static COMPUTED_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)STRFTIME|JSON_EXTRACT|datetime\(").unwrap());

/// `CASE WHEN ... END`, nearest `END`, case-sensitive.
static CASE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)CASE\s+WHEN(.+?)END").unwrap());

/// Everything the extractor recovers from one SQL command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlDetails {
    /// Tables in order of appearance, duplicates kept
    pub tables: Vec<String>,
    /// Select-list attributes in order of appearance
    pub attributes: Vec<String>,
    /// `description: ...` entries, one per CASE block
    pub case_descriptions: Vec<String>,
}

impl SqlDetails {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.attributes.is_empty() && self.case_descriptions.is_empty()
    }
}

/// Extract tables, attributes and CASE descriptions from one SQL command.
///
/// Never fails: text that does not have the expected shape yields empty lists.
pub fn extract_sql_details(sql: &str) -> SqlDetails {
    SqlDetails {
        tables: extract_table_names(sql),
        attributes: extract_attribute_names(sql),
        case_descriptions: extract_case_descriptions(sql),
    }
}

/// Every word following `FROM`, in order, duplicates kept.
pub fn extract_table_names(sql: &str) -> Vec<String> {
    TABLE_RE
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Attribute names from every `SELECT ... FROM` span.
pub fn extract_attribute_names(sql: &str) -> Vec<String> {
    let mut attributes = Vec::new();

    for caps in SELECT_SEGMENT_RE.captures_iter(sql) {
        let Some(segment) = caps.get(1) else {
            continue;
        };
        for clause in segment.as_str().split(',') {
            if let Some(attribute) = attribute_from_clause(clause.trim()) {
                attributes.push(attribute);
            }
        }
    }

    attributes
}

/// Resolve a single trimmed select-list clause to an attribute name.
///
/// Returns `None` for clauses that are dropped: `AS` with no word after it,
/// and unaliased computed columns.
pub fn attribute_from_clause(clause: &str) -> Option<String> {
    if clause.contains('*') {
        return Some(WILDCARD_ATTRIBUTE.to_string());
    }

    if AS_KEYWORD_RE.is_match(clause) {
        return ALIAS_RE
            .captures(clause)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
    }

    // Only the segment between the first and second dot is kept.
    if let Some(column) = clause.split('.').nth(1) {
        return Some(column.to_string());
    }

    if COMPUTED_CLAUSE_RE.is_match(clause) {
        return None;
    }

    Some(clause.to_string())
}

/// The body of every `CASE WHEN ... END` block, prefixed with `description: `.
pub fn extract_case_descriptions(sql: &str) -> Vec<String> {
    CASE_BLOCK_RE
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1))
        .map(|m| format!("{}{}", CASE_DESCRIPTION_PREFIX, m.as_str().trim()))
        .collect()
}
