//! Assemble the summary document from the dataset and the query model

use indexmap::IndexMap;

use super::{
    AttributeAnalysisSummary, OsquerySummary, QueryAnalysisSummary, QueryEntry,
    QueryPercentageCount, Report, Section, TableAnalysisSummary, TableQueryEntry,
};
use crate::config::ReportOptions;
use crate::dataset::{compute_data_stats, Dataset};
use crate::model::{
    classify_attributes, table_counts_by_query, total_table_query_count, QueryGroup,
    SummaryModel,
};

/// Placeholder written when a query had nothing quarantined
pub const NO_PARSING_ERRORS: &str = "None";

fn audit_list(removed: &[String]) -> Vec<String> {
    if removed.is_empty() {
        vec![NO_PARSING_ERRORS.to_string()]
    } else {
        removed.to_vec()
    }
}

fn query_entry(group: &QueryGroup, total_records: usize) -> QueryEntry {
    QueryEntry {
        query_name: group.query_name.clone(),
        frequency_of_execution: group.occurrence_count,
        percentage_of_execution: group.percentage_of(total_records),
        unique_tables_queried: group.unique_tables.iter().cloned().collect(),
        unique_attributes_queried: group.unique_attributes.iter().cloned().collect(),
        derived_case_descriptions: group.case_descriptions.iter().cloned().collect(),
        parsing_error_sql_content: audit_list(&group.removed_table_tokens),
        parsing_error_attribute_content: audit_list(&group.removed_attribute_tokens),
    }
}

/// The per-query section.
pub fn build_query_summary(model: &SummaryModel) -> QueryAnalysisSummary {
    let queries = model
        .groups
        .values()
        .map(|g| query_entry(g, model.total_records))
        .collect();

    let ranked = model.groups_by_percentage();
    let queries_by_percentage = ranked
        .iter()
        .map(|(g, pct)| (g.query_name.clone(), *pct))
        .collect();
    let queries_by_percentage_count = ranked
        .iter()
        .map(|(g, pct)| {
            (
                g.query_name.clone(),
                QueryPercentageCount {
                    query_execution_percentage: *pct,
                    query_execution_count: g.occurrence_count,
                },
            )
        })
        .collect();

    QueryAnalysisSummary {
        queries,
        queries_by_percentage,
        queries_by_percentage_count,
    }
}

/// The per-table section.
pub fn build_table_summary(model: &SummaryModel) -> TableAnalysisSummary {
    let occurrences = total_table_query_count(model);

    let table_counts_by_queries: IndexMap<String, Vec<TableQueryEntry>> =
        table_counts_by_query(model)
            .into_iter()
            .map(|(table, breakdown)| {
                let mut entries = Vec::with_capacity(breakdown.queries.len() + 1);
                entries.push(TableQueryEntry::Total {
                    total_queries: breakdown.total_queries,
                });
                entries.extend(breakdown.queries.into_iter().map(|(query_name, count)| {
                    TableQueryEntry::Query {
                        query_name,
                        number_of_times_queried: count,
                    }
                }));
                (table, entries)
            })
            .collect();

    TableAnalysisSummary {
        unique_table_list: model.unique_tables().into_iter().collect(),
        total_table_query_count: (occurrences.counts, occurrences.percentages),
        table_counts_by_queries,
    }
}

/// The attribute section.
pub fn build_attribute_summary(model: &SummaryModel) -> AttributeAnalysisSummary {
    let vocabulary = model.unique_attributes();
    AttributeAnalysisSummary {
        classification: classify_attributes(&vocabulary),
        unique_attribute_list: vocabulary.into_iter().collect(),
        incorrectly_parsed_attributes: model.removed_attributes().into_iter().collect(),
    }
}

/// Merge dataset statistics, query rollups and attribute buckets into the
/// report. Disabled sections are left empty.
pub fn build_report(dataset: &Dataset, model: &SummaryModel, options: &ReportOptions) -> Report {
    Report {
        osquery_summary: OsquerySummary {
            os_query_data_analysis_stats: Section::when(options.summarize_osqueries, || {
                compute_data_stats(dataset)
            }),
            os_query_input_query_summary: Section::when(
                options.summarize_queries_in_dataset,
                || build_query_summary(model),
            ),
            os_query_table_analysis_summary: Section::when(
                options.summarize_tables_in_dataset,
                || build_table_summary(model),
            ),
            os_query_attribute_analysis_summary: Section::when(
                options.summarize_attributes_in_dataset,
                || build_attribute_summary(model),
            ),
        },
    }
}
