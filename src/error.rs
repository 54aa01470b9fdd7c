//! Error types for rust-osquery-summary

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading inputs or writing the summary
#[derive(Error, Debug)]
pub enum OsquerySummaryError {
    #[error("Failed to read configuration file: {path}")]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file: {path}")]
    ConfigParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Input file for dataset '{dataset}' not found: {path}")]
    InputNotFound { dataset: String, path: PathBuf },

    #[error("Failed to read dataset file: {path}")]
    DatasetReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV rows in {path}")]
    DatasetParseError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write CSV output to {path}")]
    CsvWriteError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write report to {path}")]
    ReportWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {message}")]
    ReportSerializeError { message: String },
}

impl From<serde_json::Error> for OsquerySummaryError {
    fn from(err: serde_json::Error) -> Self {
        OsquerySummaryError::ReportSerializeError {
            message: err.to_string(),
        }
    }
}

impl OsquerySummaryError {
    /// Dataset-level failures skip one dataset; everything else ends the run.
    pub fn is_dataset_skippable(&self) -> bool {
        matches!(
            self,
            OsquerySummaryError::InputNotFound { .. }
                | OsquerySummaryError::DatasetReadError { .. }
                | OsquerySummaryError::DatasetParseError { .. }
        )
    }
}

/// Per-record problems. These are logged and carried alongside the record,
/// never returned as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    #[error("Invalid JSON format in Query column at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("No tables or attributes recovered from query '{query_name}' at row {row}")]
    ExtractionDegraded { row: usize, query_name: String },

    #[error("Invalid date input '{value}' in row {row}")]
    InvalidDate { row: usize, value: String },
}

impl RecordIssue {
    pub fn row(&self) -> usize {
        match self {
            RecordIssue::MalformedRecord { row, .. }
            | RecordIssue::ExtractionDegraded { row, .. }
            | RecordIssue::InvalidDate { row, .. } => *row,
        }
    }
}
