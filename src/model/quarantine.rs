//! Quarantine of tokens that leak through the lexical extractor
//!
//! Keywords that follow `FROM` inside subqueries and unaliased function names
//! are not real identifiers. They are moved out of the clean lists into
//! paired `removed` lists so a reader can see which queries the extractor
//! mis-handles.

use crate::util::contains_ci;

/// Tokens known to leak through extraction.
pub const QUARANTINED_SQL_KEYWORDS: &[&str] = &["JSON_EACH", "GROUP", "GROUP_CONCAT", "CHAR", "SELECT"];

/// A list split into kept and removed tokens, both in original order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioned {
    pub kept: Vec<String>,
    pub removed: Vec<String>,
}

/// Exact-match removal, used for table names.
pub fn quarantine_exact(tokens: &[String], denylist: &[&str]) -> Partitioned {
    let (removed, kept) = tokens
        .iter()
        .cloned()
        .partition(|token| denylist.contains(&token.as_str()));
    Partitioned { kept, removed }
}

/// Case-insensitive substring removal, used for attributes, where the leaked
/// keyword is usually embedded in a longer clause.
pub fn quarantine_contains(tokens: &[String], denylist: &[&str]) -> Partitioned {
    let (removed, kept) = tokens
        .iter()
        .cloned()
        .partition(|token| denylist.iter().any(|keyword| contains_ci(token, keyword)));
    Partitioned { kept, removed }
}

/// Per-record facts after quarantine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarantinedFacts {
    pub tables: Partitioned,
    pub attributes: Partitioned,
}

/// Apply the default denylist to one record's tables and attributes.
pub fn quarantine_facts(tables: &[String], attributes: &[String]) -> QuarantinedFacts {
    QuarantinedFacts {
        tables: quarantine_exact(tables, QUARANTINED_SQL_KEYWORDS),
        attributes: quarantine_contains(attributes, QUARANTINED_SQL_KEYWORDS),
    }
}
