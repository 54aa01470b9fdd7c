//! Tabular input: CSV loading and dataset-level statistics

mod loader;
mod stats;

pub use loader::{
    load_configured_dataset, load_dataset, parse_csv, Dataset, RawRecord, CASES_COLUMN,
    CREATED_AT_COLUMN, CUSTOMER_COLUMN, QUERY_COLUMN, REGION_COLUMN,
};
pub use stats::{
    case_counts, compute_data_stats, customer_counts, date_range, parse_list_literal,
    parse_strict_date, unique_region_list, DataAnalysisStats,
};
