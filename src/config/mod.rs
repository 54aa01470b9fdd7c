//! Analysis configuration

mod settings;

pub use settings::{
    parse_row_cap, read_config, AnalysisConfig, CombinedDatasetConfig, DatasetConfig,
    ReportOptions, CASE_MANAGER_DATASET, COMBINED_DATASET, OSQUERY_DATASET,
};
