//! Decoding of the JSON `Query` payload carried by each case record
//!
//! Every field of the payload is optional. Missing fields resolve to the
//! sentinel constants below so nothing downstream needs to probe the raw
//! JSON again.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use super::sql_extractor::{extract_sql_details, SqlDetails};
use crate::error::RecordIssue;

pub const UNNAMED_QUERY: &str = "Unnamed";
pub const COMMAND_NOT_AVAILABLE: &str = "SQL statement not available";
pub const TYPE_NOT_AVAILABLE: &str = "Type not available";
pub const ID_NOT_AVAILABLE: &str = "ID not available";
pub const CATEGORIES_NOT_AVAILABLE: &str = "Categories not available";

/// A category attached to a saved query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCategory {
    pub name: Option<String>,
}

/// The `Query` column payload, as exported by the case manager
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub command: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub principal_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub query_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub query_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_categories")]
    pub categories: Option<Vec<QueryCategory>>,
}

/// Accept any JSON scalar where a string is expected; ids are sometimes
/// exported as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string))
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Accept the category list in whatever shape it was exported.
///
/// Objects contribute their `name`, bare scalars are taken as the name
/// itself. Anything that is not a list is treated as absent.
fn lenient_categories<'de, D>(deserializer: D) -> Result<Option<Vec<QueryCategory>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Ok(None),
        Some(other) => {
            debug!("Ignoring categories of unexpected shape: {}", other);
            return Ok(None);
        }
    };

    let categories = items
        .into_iter()
        .map(|item| QueryCategory {
            name: match item {
                Value::Object(mut fields) => fields.remove("name").and_then(scalar_to_string),
                scalar => scalar_to_string(scalar),
            },
        })
        .collect();
    Ok(Some(categories))
}

impl QueryPayload {
    /// Decode a raw `Query` cell.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Metadata resolved from one record's payload, sentinels applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMetadata {
    pub name: String,
    pub command: String,
    pub principal_type: String,
    pub query_id: String,
    pub query_type: String,
    pub categories: String,
}

impl Default for QueryMetadata {
    fn default() -> Self {
        Self {
            name: UNNAMED_QUERY.to_string(),
            command: COMMAND_NOT_AVAILABLE.to_string(),
            principal_type: TYPE_NOT_AVAILABLE.to_string(),
            query_id: ID_NOT_AVAILABLE.to_string(),
            query_type: TYPE_NOT_AVAILABLE.to_string(),
            categories: CATEGORIES_NOT_AVAILABLE.to_string(),
        }
    }
}

impl From<QueryPayload> for QueryMetadata {
    fn from(payload: QueryPayload) -> Self {
        let categories = match payload.categories {
            Some(categories) => categories
                .into_iter()
                .map(|c| c.name.unwrap_or_default())
                .collect::<Vec<_>>()
                .join(", "),
            None => CATEGORIES_NOT_AVAILABLE.to_string(),
        };

        Self {
            name: payload.name.unwrap_or_else(|| UNNAMED_QUERY.to_string()),
            command: payload
                .command
                .map(|c| c.replace("\\n", "\n"))
                .unwrap_or_else(|| COMMAND_NOT_AVAILABLE.to_string()),
            principal_type: payload
                .principal_type
                .unwrap_or_else(|| TYPE_NOT_AVAILABLE.to_string()),
            query_id: payload
                .query_id
                .unwrap_or_else(|| ID_NOT_AVAILABLE.to_string()),
            query_type: payload
                .query_type
                .unwrap_or_else(|| TYPE_NOT_AVAILABLE.to_string()),
            categories,
        }
    }
}

/// Per-record extraction result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFacts {
    pub query_name: String,
    pub tables: Vec<String>,
    pub attributes: Vec<String>,
    pub case_descriptions: Vec<String>,
}

impl QueryFacts {
    fn new(query_name: String, details: SqlDetails) -> Self {
        Self {
            query_name,
            tables: details.tables,
            attributes: details.attributes,
            case_descriptions: details.case_descriptions,
        }
    }
}

/// One record after payload decoding and SQL extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    /// Zero-based row index in the source dataset
    pub row: usize,
    pub metadata: QueryMetadata,
    pub facts: QueryFacts,
    pub issue: Option<RecordIssue>,
}

/// Decode one record's `Query` cell and extract its SQL facts.
///
/// A missing or undecodable payload produces sentinel metadata and empty
/// facts; the record is always returned so row counts stay aligned with the
/// dataset.
pub fn normalize_record(row: usize, raw_query: Option<&str>) -> NormalizedRecord {
    let raw = raw_query.map(str::trim).filter(|s| !s.is_empty());

    let payload = match raw {
        Some(raw) => QueryPayload::from_json(raw).map_err(|e| e.to_string()),
        None => Err("Query column is empty".to_string()),
    };

    match payload {
        Ok(payload) => {
            let has_command = payload.command.is_some();
            let metadata = QueryMetadata::from(payload);
            let details = if has_command {
                extract_sql_details(&metadata.command)
            } else {
                SqlDetails::default()
            };

            let issue = if has_command && details.tables.is_empty() && details.attributes.is_empty()
            {
                let issue = RecordIssue::ExtractionDegraded {
                    row,
                    query_name: metadata.name.clone(),
                };
                debug!("{}", issue);
                Some(issue)
            } else {
                None
            };

            let facts = QueryFacts::new(metadata.name.clone(), details);
            NormalizedRecord {
                row,
                metadata,
                facts,
                issue,
            }
        }
        Err(reason) => {
            let issue = RecordIssue::MalformedRecord { row, reason };
            warn!("{}", issue);
            let metadata = QueryMetadata::default();
            NormalizedRecord {
                row,
                facts: QueryFacts {
                    query_name: metadata.name.clone(),
                    ..QueryFacts::default()
                },
                metadata,
                issue: Some(issue),
            }
        }
    }
}
