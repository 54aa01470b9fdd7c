//! Summary report document and its writers
//!
//! The report always has the same four sections. A section that was not
//! requested serializes as `{}` so consumers can rely on the key set.

mod assembler;
mod writer;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::dataset::DataAnalysisStats;
use crate::model::AttributeClassification;

pub use assembler::{
    build_attribute_summary, build_query_summary, build_report, build_table_summary,
    NO_PARSING_ERRORS,
};
pub use writer::{
    report_to_json_string, write_combined_csv, write_json_report, write_query_summary_csv,
    COMBINED_CSV_FILE, JSON_SUMMARY_FILE, QUERY_SUMMARY_CSV_FILE,
};

/// A report section that may have been switched off
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Enabled(T),
    Disabled,
}

impl<T> Section<T> {
    pub fn when(enabled: bool, build: impl FnOnce() -> T) -> Self {
        if enabled {
            Section::Enabled(build())
        } else {
            Section::Disabled
        }
    }

    pub fn as_enabled(&self) -> Option<&T> {
        match self {
            Section::Enabled(value) => Some(value),
            Section::Disabled => None,
        }
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Section::Enabled(value) => value.serialize(serializer),
            Section::Disabled => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// One entry of the `queries` list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEntry {
    pub query_name: String,
    pub frequency_of_execution: usize,
    pub percentage_of_execution: f64,
    pub unique_tables_queried: Vec<String>,
    pub unique_attributes_queried: Vec<String>,
    pub derived_case_descriptions: Vec<String>,
    /// Quarantined table tokens, `["None"]` when clean
    pub parsing_error_sql_content: Vec<String>,
    /// Quarantined attribute tokens, `["None"]` when clean
    pub parsing_error_attribute_content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPercentageCount {
    pub query_execution_percentage: f64,
    pub query_execution_count: usize,
}

/// `os_query_input_query_summary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnalysisSummary {
    pub queries: Vec<QueryEntry>,
    pub queries_by_percentage: IndexMap<String, f64>,
    pub queries_by_percentage_count: IndexMap<String, QueryPercentageCount>,
}

/// An entry under `table_counts_by_queries`. The first entry of every list is
/// the table's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableQueryEntry {
    Total {
        total_queries: usize,
    },
    Query {
        query_name: String,
        number_of_times_queried: usize,
    },
}

/// `os_query_table_analysis_summary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableAnalysisSummary {
    pub unique_table_list: Vec<String>,
    /// `[counts by table, percentage of all table occurrences]`
    pub total_table_query_count: (IndexMap<String, usize>, IndexMap<String, f64>),
    pub table_counts_by_queries: IndexMap<String, Vec<TableQueryEntry>>,
}

/// `os_query_attribute_analysis_summary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeAnalysisSummary {
    #[serde(flatten)]
    pub classification: AttributeClassification,
    pub unique_attribute_list: Vec<String>,
    pub incorrectly_parsed_attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsquerySummary {
    pub os_query_data_analysis_stats: Section<DataAnalysisStats>,
    pub os_query_input_query_summary: Section<QueryAnalysisSummary>,
    pub os_query_table_analysis_summary: Section<TableAnalysisSummary>,
    pub os_query_attribute_analysis_summary: Section<AttributeAnalysisSummary>,
}

/// The complete summary document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub osquery_summary: OsquerySummary,
}
