//! Aggregated query model: grouping, quarantine, table rollups and
//! attribute classification

mod attribute_classifier;
mod builder;
mod quarantine;
mod table_rollup;

pub use attribute_classifier::{
    classify_attribute, classify_attributes, AttributeBucket, AttributeClassification,
};
pub use builder::{
    build_summary_model, QueryGroup, RecordSummary, SummaryModel, PERCENT_DECIMAL_PLACES,
};
pub use quarantine::{
    quarantine_contains, quarantine_exact, quarantine_facts, Partitioned, QuarantinedFacts,
    QUARANTINED_SQL_KEYWORDS,
};
pub use table_rollup::{
    table_counts_by_query, total_table_query_count, TableOccurrenceCounts, TableQueryBreakdown,
    TABLE_PERCENT_DECIMAL_PLACES,
};
