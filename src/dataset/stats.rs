//! Dataset-level statistics for the summary header

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::loader::Dataset;
use crate::error::RecordIssue;

/// Counts and ranges describing the analysed dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataAnalysisStats {
    pub total_number_queries_analyzed: usize,
    pub number_of_unique_cases: usize,
    pub total_number_of_cases_analyzed: usize,
    pub number_of_unique_customers: usize,
    pub total_number_of_customers_analyzed: usize,
    pub region_list: Vec<String>,
    /// `[earliest, latest]`, empty when no row has a valid date
    pub date_range: Vec<String>,
    #[serde(skip)]
    pub issues: Vec<RecordIssue>,
}

/// Compute the dataset statistics section.
pub fn compute_data_stats(dataset: &Dataset) -> DataAnalysisStats {
    let (number_of_unique_cases, total_number_of_cases_analyzed) =
        case_counts(dataset.records.iter().map(|r| r.possible_cases.as_deref()));
    let (number_of_unique_customers, total_number_of_customers_analyzed) =
        customer_counts(dataset.records.iter().map(|r| r.customer_id.as_deref()));
    let region_list = unique_region_list(dataset.records.iter().map(|r| r.region.as_deref()));
    let (date_range, issues) = date_range(dataset.records.iter().map(|r| r.created_at.as_deref()));

    DataAnalysisStats {
        total_number_queries_analyzed: dataset.len(),
        number_of_unique_cases,
        total_number_of_cases_analyzed,
        number_of_unique_customers,
        total_number_of_customers_analyzed,
        region_list,
        date_range,
        issues,
    }
}

/// `(unique, total)` case counts over list-valued cells. Cells that are not a
/// list literal are skipped.
pub fn case_counts<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> (usize, usize) {
    let mut unique = HashSet::new();
    let mut total = 0;

    for cell in cells.flatten() {
        if let Some(values) = parse_list_literal(cell) {
            total += values.len();
            unique.extend(values);
        }
    }

    (unique.len(), total)
}

/// `(unique, total)` customer counts. Every row counts; blank cells count as
/// one shared empty customer id.
pub fn customer_counts<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> (usize, usize) {
    let mut unique = HashSet::new();
    let mut total = 0;

    for cell in cells {
        unique.insert(cell.unwrap_or_default().trim().to_string());
        total += 1;
    }

    (unique.len(), total)
}

/// Sorted, deduplicated region names. Blank cells are not a region.
pub fn unique_region_list<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    cells
        .flatten()
        .map(str::trim)
        .filter(|region| !region.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Strict `YYYY-MM-DD` parse.
pub fn parse_strict_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// `[earliest, latest]` over the valid dates, plus one issue per invalid row.
pub fn date_range<'a>(
    cells: impl Iterator<Item = Option<&'a str>>,
) -> (Vec<String>, Vec<RecordIssue>) {
    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;
    let mut issues = Vec::new();

    for (row, cell) in cells.enumerate() {
        let value = cell.unwrap_or_default().trim();
        match parse_strict_date(value) {
            Some(date) => {
                earliest = Some(earliest.map_or(date, |e| e.min(date)));
                latest = Some(latest.map_or(date, |l| l.max(date)));
            }
            None => {
                let issue = RecordIssue::InvalidDate {
                    row,
                    value: value.to_string(),
                };
                warn!("{}", issue);
                issues.push(issue);
            }
        }
    }

    let range = match (earliest, latest) {
        (Some(e), Some(l)) => vec![e.format("%Y-%m-%d").to_string(), l.format("%Y-%m-%d").to_string()],
        _ => Vec::new(),
    };
    (range, issues)
}

/// Parse a list literal such as `['CASE-1', 'CASE-2']` or `[101, 102]`.
///
/// Returns `None` for anything that is not a bracketed list.
pub fn parse_list_literal(cell: &str) -> Option<Vec<String>> {
    let inner = cell.trim().strip_prefix('[')?.strip_suffix(']')?;

    let mut values = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };

        let value = if first == '\'' || first == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => value.push(chars.next()?),
                    c if c == first => {
                        closed = true;
                        break;
                    }
                    c => value.push(c),
                }
            }
            if !closed {
                return None;
            }
            value
        } else {
            let mut value = String::new();
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                value.push(c);
                chars.next();
            }
            let value = value.trim().to_string();
            if value.is_empty() || value.parse::<f64>().is_err() {
                return None;
            }
            value
        };
        values.push(value);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            Some(',') | None => {}
            Some(_) => return None,
        }
    }

    Some(values)
}
