//! JSON and CSV writers for the summary outputs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::Report;
use crate::dataset::{Dataset, QUERY_COLUMN};
use crate::error::OsquerySummaryError;
use crate::model::SummaryModel;
use crate::parser::NormalizedRecord;
use crate::util::format_list;

pub const JSON_SUMMARY_FILE: &str = "osquery_summary.json";
pub const COMBINED_CSV_FILE: &str = "combined_case_query_data.csv";
pub const QUERY_SUMMARY_CSV_FILE: &str = "query_summary.csv";

/// Columns appended to the combined export. `extracted_name` is placed right
/// after `Query` instead.
const EXTRACTED_COLUMNS: &[&str] = &[
    "extracted_sql_statement",
    "extracted_principal_type",
    "extracted_query_id",
    "extracted_query_type",
    "extracted_query_categories",
];

const QUERY_SUMMARY_COLUMNS: &[&str] = &[
    "query_name",
    "os_query_table",
    "unique_osquery_table",
    "query_attributes",
    "unique_osquery_attributes",
    "os_query_table_removed_items",
    "query_attributes_removed_items",
];

/// Render the report as 4-space indented JSON.
pub fn report_to_json_string(report: &Report) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report
        .serialize(&mut serializer)
        .map_err(OsquerySummaryError::from)?;
    let json = String::from_utf8(buf).map_err(|e| OsquerySummaryError::ReportSerializeError {
        message: e.to_string(),
    })?;
    Ok(json)
}

/// Write the report to `path`.
pub fn write_json_report(report: &Report, path: &Path) -> Result<()> {
    let json = report_to_json_string(report)?;
    let write_err = |e| OsquerySummaryError::ReportWriteError {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes()).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    info!("Exported to {}", path.display());
    Ok(())
}

fn csv_writer(path: &Path, always_quote: bool) -> Result<csv::Writer<File>> {
    let quote_style = if always_quote {
        csv::QuoteStyle::Always
    } else {
        csv::QuoteStyle::Necessary
    };
    csv::WriterBuilder::new()
        .quote_style(quote_style)
        .from_path(path)
        .map_err(|e| {
            OsquerySummaryError::CsvWriteError {
                path: path.to_path_buf(),
                source: e,
            }
            .into()
        })
}

/// The statement cell keeps literal surrounding double quotes inside the CSV
/// quoting.
fn quoted_statement(command: &str) -> String {
    format!("\"{}\"", command)
}

/// Write the input rows with the decoded payload fields alongside them.
pub fn write_combined_csv(
    dataset: &Dataset,
    normalized: &[NormalizedRecord],
    path: &Path,
) -> Result<()> {
    let csv_err = |e| OsquerySummaryError::CsvWriteError {
        path: path.to_path_buf(),
        source: e,
    };

    let query_idx = dataset.headers.iter().position(|h| h.trim() == QUERY_COLUMN);
    let name_slot = query_idx.map_or(dataset.headers.len(), |i| i + 1);

    let mut headers: Vec<&str> = dataset.headers.iter().map(String::as_str).collect();
    headers.insert(name_slot, "extracted_name");
    headers.extend_from_slice(EXTRACTED_COLUMNS);

    let mut writer = csv_writer(path, true)?;
    writer.write_record(&headers).map_err(csv_err)?;

    for (record, normalized) in dataset.records.iter().zip(normalized) {
        let meta = &normalized.metadata;
        let statement = quoted_statement(&meta.command);
        let mut row: Vec<&str> = (0..dataset.headers.len())
            .map(|i| record.cells.get(i).map_or("", String::as_str))
            .collect();
        row.insert(name_slot, meta.name.as_str());
        row.extend_from_slice(&[
            statement.as_str(),
            meta.principal_type.as_str(),
            meta.query_id.as_str(),
            meta.query_type.as_str(),
            meta.categories.as_str(),
        ]);
        writer.write_record(&row).map_err(csv_err)?;
    }

    writer.flush().map_err(|e| OsquerySummaryError::ReportWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Combined case query data output to '{}'.", path.display());
    Ok(())
}

/// Write one row per record with its quarantined table and attribute lists.
pub fn write_query_summary_csv(model: &SummaryModel, path: &Path) -> Result<()> {
    let csv_err = |e| OsquerySummaryError::CsvWriteError {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv_writer(path, false)?;
    writer.write_record(QUERY_SUMMARY_COLUMNS).map_err(csv_err)?;

    for record in &model.records {
        writer
            .write_record([
                record.query_name.clone(),
                format_list(&record.tables),
                format_list(&record.unique_tables),
                format_list(&record.attributes),
                format_list(&record.unique_attributes),
                format_list(&record.removed_tables),
                format_list(&record.removed_attributes),
            ])
            .map_err(csv_err)?;
    }

    writer.flush().map_err(|e| OsquerySummaryError::ReportWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Query summary output to '{}'.", path.display());
    Ok(())
}
