//! YAML analysis configuration

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::OsquerySummaryError;

/// Name of the optional case-manager export
pub const CASE_MANAGER_DATASET: &str = "case_manager_data";
/// Name of the optional raw osquery export
pub const OSQUERY_DATASET: &str = "osquery_data";
/// Name of the combined case/query export that drives the summary
pub const COMBINED_DATASET: &str = "combined_case_query_data";

/// One dataset entry: where to read it and how many rows to load
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub path: Option<String>,
    /// Row cap. Accepts an integer, a numeric string, an empty value or null.
    #[serde(default)]
    pub load_nrows: Option<serde_yaml::Value>,
}

impl DatasetConfig {
    /// The configured path, if one was given.
    pub fn path(&self) -> Option<PathBuf> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// The configured row cap. Invalid values load every row.
    pub fn row_cap(&self) -> Option<usize> {
        parse_row_cap(self.load_nrows.as_ref())
    }
}

fn default_true() -> bool {
    true
}

/// The combined dataset entry with its output toggles
#[derive(Debug, Clone, Deserialize)]
pub struct CombinedDatasetConfig {
    #[serde(flatten)]
    pub dataset: DatasetConfig,
    #[serde(default, alias = "print_combined_case_query_data_frame")]
    pub print_combined_data_frame: bool,
    #[serde(default)]
    pub summarize_query: bool,
    #[serde(default)]
    pub generate_json_summary: bool,
    #[serde(default = "default_true")]
    pub summarize_osqueries: bool,
    #[serde(default = "default_true")]
    pub summarize_queries_in_dataset: bool,
    #[serde(default = "default_true")]
    pub summarize_attributes_in_dataset: bool,
    #[serde(default = "default_true")]
    pub summarize_tables_in_dataset: bool,
}

impl Default for CombinedDatasetConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            print_combined_data_frame: false,
            summarize_query: false,
            generate_json_summary: false,
            summarize_osqueries: true,
            summarize_queries_in_dataset: true,
            summarize_attributes_in_dataset: true,
            summarize_tables_in_dataset: true,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub case_manager_data: DatasetConfig,
    #[serde(default)]
    pub osquery_data: DatasetConfig,
    #[serde(default)]
    pub combined_case_query_data: CombinedDatasetConfig,
}

/// Which report sections and side outputs a run produces.
///
/// Built once from the configuration and passed by reference into the
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub print_combined_data_frame: bool,
    pub summarize_query: bool,
    pub generate_json_summary: bool,
    pub summarize_osqueries: bool,
    pub summarize_queries_in_dataset: bool,
    pub summarize_attributes_in_dataset: bool,
    pub summarize_tables_in_dataset: bool,
}

impl ReportOptions {
    /// Every report section enabled, no side files.
    pub fn all_sections() -> Self {
        Self {
            print_combined_data_frame: false,
            summarize_query: false,
            generate_json_summary: false,
            summarize_osqueries: true,
            summarize_queries_in_dataset: true,
            summarize_attributes_in_dataset: true,
            summarize_tables_in_dataset: true,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::all_sections()
    }
}

impl From<&CombinedDatasetConfig> for ReportOptions {
    fn from(config: &CombinedDatasetConfig) -> Self {
        Self {
            print_combined_data_frame: config.print_combined_data_frame,
            summarize_query: config.summarize_query,
            generate_json_summary: config.generate_json_summary,
            summarize_osqueries: config.summarize_osqueries,
            summarize_queries_in_dataset: config.summarize_queries_in_dataset,
            summarize_attributes_in_dataset: config.summarize_attributes_in_dataset,
            summarize_tables_in_dataset: config.summarize_tables_in_dataset,
        }
    }
}

impl AnalysisConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(yaml: &str, path: &Path) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Err(OsquerySummaryError::InvalidConfig {
                message: format!("configuration file {} is empty", path.display()),
            }
            .into());
        }

        let config: AnalysisConfig =
            serde_yaml::from_str(yaml).map_err(|e| OsquerySummaryError::ConfigParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(config)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions::from(&self.combined_case_query_data)
    }
}

/// Read and parse the YAML configuration file.
pub fn read_config(path: &Path) -> Result<AnalysisConfig> {
    info!("Reading YAML configuration file from: {}", path.display());

    let content =
        std::fs::read_to_string(path).map_err(|e| OsquerySummaryError::ConfigReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let config = AnalysisConfig::from_yaml_str(&content, path)?;
    info!("YAML configuration successfully loaded.");
    Ok(config)
}

/// Interpret a `load_nrows` value.
pub fn parse_row_cap(value: Option<&serde_yaml::Value>) -> Option<usize> {
    use serde_yaml::Value;

    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(n) => Some(n as usize),
            None => {
                warn!("Invalid value for load_nrows: {:?}. Defaulting to load all rows.", n);
                None
            }
        },
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.trim().parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!("Invalid value for load_nrows: '{}'. Defaulting to load all rows.", s);
                None
            }
        },
        Some(other) => {
            warn!("Invalid value for load_nrows: {:?}. Defaulting to load all rows.", other);
            None
        }
    }
}
