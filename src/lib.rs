//! rust-osquery-summary: Summarize the osquery SQL carried by case records
//!
//! This library reads case-management exports whose `Query` column holds an
//! ad-hoc osquery payload, lexically extracts the tables and attributes each
//! query touches, and folds the results into a JSON summary of query
//! frequency, table usage and attribute quality.

pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod util;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

pub use config::ReportOptions;
pub use error::{OsquerySummaryError, RecordIssue};

use dataset::Dataset;
use model::SummaryModel;
use parser::NormalizedRecord;
use report::Report;

/// Options for an analysis run
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Path to the YAML configuration file
    pub config_path: PathBuf,
    /// Directory the summary files are written to
    pub output_dir: PathBuf,
    /// Enable verbose output
    pub verbose: bool,
}

/// Everything produced from one dataset
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<NormalizedRecord>,
    pub model: SummaryModel,
    pub report: Report,
}

impl Analysis {
    /// Per-record issues, in row order.
    pub fn issues(&self) -> impl Iterator<Item = &RecordIssue> {
        self.records.iter().filter_map(|r| r.issue.as_ref())
    }
}

/// Files written by [`run_analysis`]
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutputs {
    pub json_summary: Option<PathBuf>,
    pub combined_csv: Option<PathBuf>,
    pub query_summary_csv: Option<PathBuf>,
}

/// Normalize every record, fold the facts into the query model and assemble
/// the report.
pub fn analyze_dataset(dataset: &Dataset, options: &ReportOptions) -> Analysis {
    let mut model = SummaryModel::new();
    let records: Vec<NormalizedRecord> = dataset
        .records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let normalized = parser::normalize_record(row, record.query.as_deref());
            model.add(&normalized.facts);
            normalized
        })
        .collect();

    debug!(
        "Folded {} records into {} query groups",
        model.total_records,
        model.groups.len()
    );

    let report = report::build_report(dataset, &model, options);
    Analysis {
        records,
        model,
        report,
    }
}

/// Run the configured analysis end to end
pub fn run_analysis(options: AnalyzeOptions) -> Result<AnalysisOutputs> {
    info!("Starting program execution.");

    // Step 1: Read the configuration
    let config = config::read_config(&options.config_path)?;
    let report_options = config.report_options();

    // Step 2: Load the auxiliary datasets
    for (name, dataset_config) in [
        (config::CASE_MANAGER_DATASET, &config.case_manager_data),
        (config::OSQUERY_DATASET, &config.osquery_data),
    ] {
        if let Some(dataset) = dataset::load_configured_dataset(name, dataset_config)? {
            info!("Dataset '{}' has {} columns", name, dataset.headers.len());
        }
    }

    // Step 3: Load the combined case/query dataset
    let Some(combined) = dataset::load_configured_dataset(
        config::COMBINED_DATASET,
        &config.combined_case_query_data.dataset,
    )?
    else {
        info!("Program execution completed.");
        return Ok(AnalysisOutputs::default());
    };

    // Step 4: Analyze
    let analysis = analyze_dataset(&combined, &report_options);
    if options.verbose {
        info!(
            "Analyzed {} records ({} with issues)",
            analysis.records.len(),
            analysis.issues().count()
        );
    }

    // Step 5: Write outputs
    std::fs::create_dir_all(&options.output_dir).map_err(|e| {
        OsquerySummaryError::ReportWriteError {
            path: options.output_dir.clone(),
            source: e,
        }
    })?;

    let mut outputs = AnalysisOutputs::default();

    if report_options.print_combined_data_frame {
        let path = options.output_dir.join(report::COMBINED_CSV_FILE);
        report::write_combined_csv(&combined, &analysis.records, &path)?;
        outputs.combined_csv = Some(path);
    }

    if report_options.summarize_query {
        let path = options.output_dir.join(report::QUERY_SUMMARY_CSV_FILE);
        report::write_query_summary_csv(&analysis.model, &path)?;
        outputs.query_summary_csv = Some(path);
    }

    if report_options.generate_json_summary {
        let path = options.output_dir.join(report::JSON_SUMMARY_FILE);
        report::write_json_report(&analysis.report, &path)?;
        outputs.json_summary = Some(path);
    }

    info!("Program execution completed.");
    Ok(outputs)
}
