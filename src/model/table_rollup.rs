//! Per-table rollups across all records

use indexmap::IndexMap;

use super::builder::SummaryModel;
use crate::util::round_to;

/// Decimal places kept for table occurrence percentages
pub const TABLE_PERCENT_DECIMAL_PLACES: i32 = 2;

/// How often each table occurs, and its share of all table occurrences.
/// Both maps are ordered by count descending, ties in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOccurrenceCounts {
    pub counts: IndexMap<String, usize>,
    pub percentages: IndexMap<String, f64>,
}

/// Queries touching one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQueryBreakdown {
    pub total_queries: usize,
    /// `(query_name, number_of_times_queried)`, count descending
    pub queries: Vec<(String, usize)>,
}

/// Count clean table occurrences over every record.
pub fn total_table_query_count(model: &SummaryModel) -> TableOccurrenceCounts {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in &model.records {
        for table in &record.tables {
            *counts.entry(table.clone()).or_insert(0) += 1;
        }
    }
    counts.sort_by(|_, a, _, b| b.cmp(a));

    let total: usize = counts.values().sum();
    let percentages = counts
        .iter()
        .map(|(table, count)| {
            let pct = if total == 0 {
                0.0
            } else {
                round_to(*count as f64 / total as f64 * 100.0, TABLE_PERCENT_DECIMAL_PLACES)
            };
            (table.clone(), pct)
        })
        .collect();

    TableOccurrenceCounts {
        counts,
        percentages,
    }
}

/// For each table, which queries touched it and how often. Tables are ordered
/// by total volume descending.
pub fn table_counts_by_query(model: &SummaryModel) -> IndexMap<String, TableQueryBreakdown> {
    let mut by_table: IndexMap<String, IndexMap<String, usize>> = IndexMap::new();
    for record in &model.records {
        for table in &record.tables {
            *by_table
                .entry(table.clone())
                .or_default()
                .entry(record.query_name.clone())
                .or_insert(0) += 1;
        }
    }

    let mut result: IndexMap<String, TableQueryBreakdown> = by_table
        .into_iter()
        .map(|(table, queries)| {
            let total_queries = queries.values().sum();
            let mut queries: Vec<(String, usize)> = queries.into_iter().collect();
            queries.sort_by(|a, b| b.1.cmp(&a.1));
            (
                table,
                TableQueryBreakdown {
                    total_queries,
                    queries,
                },
            )
        })
        .collect();
    result.sort_by(|_, a, _, b| b.total_queries.cmp(&a.total_queries));
    result
}
