//! Common test utilities for rust-osquery-summary tests

use std::fs;
use std::path::PathBuf;

use rust_osquery_summary::{run_analysis, AnalysisOutputs, AnalyzeOptions};
use serde_json::Value;
use tempfile::TempDir;

/// Header row used by the combined dataset fixtures
pub const COMBINED_HEADERS: &str = "Query,Possible Cases,Customer ID,Region,Created At (UTC)";

/// Every output toggle switched on
pub const ALL_OUTPUTS: &str = "  print_combined_case_query_data_frame: true
  summarize_query: true
  generate_json_summary: true
";

/// Test context with temporary directory for isolated test execution
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub work_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            work_dir,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.work_dir.join("osquery_data_config.yml")
    }

    pub fn combined_path(&self) -> PathBuf {
        self.work_dir.join("combined.csv")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.work_dir.join("out")
    }

    /// Write the combined dataset from pre-rendered CSV lines.
    pub fn write_combined(&self, lines: &[String]) {
        let mut content = String::from(COMBINED_HEADERS);
        content.push('\n');
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(self.combined_path(), content).expect("Failed to write combined dataset");
    }

    /// Write a config pointing at the combined dataset. `toggles` is appended
    /// verbatim under `combined_case_query_data`.
    pub fn write_config(&self, toggles: &str) {
        let yaml = format!(
            "case_manager_data:\n  path: \"\"\n  load_nrows: \"\"\nosquery_data:\n  path: {}\ncombined_case_query_data:\n  path: {}\n{}",
            self.work_dir.join("missing_osquery.csv").display(),
            self.combined_path().display(),
            toggles
        );
        fs::write(self.config_path(), yaml).expect("Failed to write config");
    }

    pub fn options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            config_path: self.config_path(),
            output_dir: self.output_dir(),
            verbose: false,
        }
    }

    /// Run the analysis, panicking if it fails.
    pub fn run_successfully(&self) -> AnalysisOutputs {
        match run_analysis(self.options()) {
            Ok(outputs) => outputs,
            Err(e) => panic!("Analysis failed: {:#}", e),
        }
    }

    /// Run the analysis and parse the JSON summary it wrote.
    pub fn run_json(&self) -> Value {
        let outputs = self.run_successfully();
        let path = outputs.json_summary.expect("JSON summary was not written");
        let content = fs::read_to_string(path).expect("Failed to read JSON summary");
        serde_json::from_str(&content).expect("JSON summary is not valid JSON")
    }
}

/// Render one combined-dataset CSV line whose `Query` cell carries `payload`.
pub fn combined_row(payload: &Value, cases: &str, customer: &str, region: &str, date: &str) -> String {
    let query = payload.to_string().replace('"', "\"\"");
    let cases = cases.replace('"', "\"\"");
    format!(
        "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"",
        query, cases, customer, region, date
    )
}

/// Payload with just a name and a command.
pub fn query_payload(name: &str, command: &str) -> Value {
    serde_json::json!({
        "name": name,
        "command": command,
        "principalType": "user",
        "queryId": format!("id-{}", name),
        "queryType": "adhoc",
        "categories": [{"name": "Threat hunting"}],
    })
}
