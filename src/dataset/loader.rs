//! Load CSV exports into memory

use std::path::Path;

use anyhow::Result;
use encoding_rs::WINDOWS_1252;
use tracing::{error, info};

use crate::config::DatasetConfig;
use crate::error::OsquerySummaryError;

/// Column holding the JSON query payload
pub const QUERY_COLUMN: &str = "Query";
/// Column holding the list of cases a query was attached to
pub const CASES_COLUMN: &str = "Possible Cases";
/// Column holding the customer identifier
pub const CUSTOMER_COLUMN: &str = "Customer ID";
/// Column holding the customer region
pub const REGION_COLUMN: &str = "Region";
/// Column holding the record creation date
pub const CREATED_AT_COLUMN: &str = "Created At (UTC)";

/// One input row.
///
/// The well-known columns are resolved at load time; `cells` keeps the full
/// row for pass-through output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub query: Option<String>,
    pub possible_cases: Option<String>,
    pub customer_id: Option<String>,
    pub region: Option<String>,
    pub created_at: Option<String>,
    pub cells: Vec<String>,
}

/// A loaded dataset: header plus rows, in file order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a dataset from in-memory rows, resolving the well-known columns
    /// by header name.
    pub fn from_rows(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let index_of = |column: &str| headers.iter().position(|h| h.trim() == column);
        let query_idx = index_of(QUERY_COLUMN);
        let cases_idx = index_of(CASES_COLUMN);
        let customer_idx = index_of(CUSTOMER_COLUMN);
        let region_idx = index_of(REGION_COLUMN);
        let created_idx = index_of(CREATED_AT_COLUMN);

        let cell = |row: &[String], idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i)).cloned()
        };

        let records = rows
            .into_iter()
            .map(|row| RawRecord {
                query: cell(&row, query_idx),
                possible_cases: cell(&row, cases_idx),
                customer_id: cell(&row, customer_idx),
                region: cell(&row, region_idx),
                created_at: cell(&row, created_idx),
                cells: row,
            })
            .collect();

        Self {
            name: name.to_string(),
            headers,
            records,
        }
    }
}

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
fn read_file_with_encoding_fallback(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            // Case-manager exports saved from Excel are often Windows-1252
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ));
            }
            decoded.into_owned()
        }
    };

    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Parse CSV text into a dataset, keeping at most `row_cap` rows.
pub fn parse_csv(name: &str, content: &str, row_cap: Option<usize>, path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| OsquerySummaryError::DatasetParseError {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        if row_cap.is_some_and(|cap| rows.len() >= cap) {
            break;
        }
        let record = record.map_err(|e| OsquerySummaryError::DatasetParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(Dataset::from_rows(name, headers, rows))
}

/// Load one dataset from disk.
pub fn load_dataset(name: &str, path: &Path, row_cap: Option<usize>) -> Result<Dataset> {
    if !path.exists() {
        return Err(OsquerySummaryError::InputNotFound {
            dataset: name.to_string(),
            path: path.to_path_buf(),
        }
        .into());
    }

    let content =
        read_file_with_encoding_fallback(path).map_err(|e| OsquerySummaryError::DatasetReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let dataset = parse_csv(name, &content, row_cap, path)?;
    info!(
        "CSV data for '{}' successfully loaded. Loaded {} rows.",
        name,
        dataset.len()
    );
    Ok(dataset)
}

/// Load a configured dataset, skipping it when it has no path or cannot be
/// read. Configuration-level failures still propagate.
pub fn load_configured_dataset(name: &str, config: &DatasetConfig) -> Result<Option<Dataset>> {
    let Some(path) = config.path() else {
        info!("Path for '{}' is empty. Skipping processing.", name);
        return Ok(None);
    };

    match load_dataset(name, &path, config.row_cap()) {
        Ok(dataset) => Ok(Some(dataset)),
        Err(err) => match err.downcast_ref::<OsquerySummaryError>() {
            Some(e) if e.is_dataset_skippable() => {
                error!("Skipping dataset '{}': {:#}", name, err);
                Ok(None)
            }
            _ => Err(err),
        },
    }
}
