//! Unit tests for YAML configuration parsing

use std::io::Write;
use std::path::{Path, PathBuf};

use rust_osquery_summary::config::{read_config, AnalysisConfig, ReportOptions};
use rust_osquery_summary::OsquerySummaryError;
use tempfile::NamedTempFile;

fn create_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".yml").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_config() {
    let yaml = r#"
case_manager_data:
  path: ./cases.csv
  load_nrows: 10
osquery_data:
  path: ""
  load_nrows: ""
combined_case_query_data:
  path: ./combined.csv
  load_nrows: "250"
  print_combined_case_query_data_frame: true
  summarize_query: true
  generate_json_summary: true
  summarize_osqueries: true
  summarize_queries_in_dataset: false
  summarize_attributes_in_dataset: true
  summarize_tables_in_dataset: false
"#;
    let config = AnalysisConfig::from_yaml_str(yaml, Path::new("test.yml")).unwrap();

    assert_eq!(config.case_manager_data.path(), Some(PathBuf::from("./cases.csv")));
    assert_eq!(config.case_manager_data.row_cap(), Some(10));
    assert_eq!(config.osquery_data.path(), None);
    assert_eq!(config.osquery_data.row_cap(), None);

    let combined = &config.combined_case_query_data;
    assert_eq!(combined.dataset.path(), Some(PathBuf::from("./combined.csv")));
    assert_eq!(combined.dataset.row_cap(), Some(250));

    assert_eq!(
        config.report_options(),
        ReportOptions {
            print_combined_data_frame: true,
            summarize_query: true,
            generate_json_summary: true,
            summarize_osqueries: true,
            summarize_queries_in_dataset: false,
            summarize_attributes_in_dataset: true,
            summarize_tables_in_dataset: false,
        }
    );
}

#[test]
fn test_short_toggle_name_is_accepted() {
    let yaml = r#"
combined_case_query_data:
  path: combined.csv
  print_combined_data_frame: true
"#;
    let config = AnalysisConfig::from_yaml_str(yaml, Path::new("test.yml")).unwrap();
    assert!(config.report_options().print_combined_data_frame);
}

#[test]
fn test_section_toggles_default_on_and_outputs_default_off() {
    let yaml = "combined_case_query_data:\n  path: combined.csv\n";
    let config = AnalysisConfig::from_yaml_str(yaml, Path::new("test.yml")).unwrap();
    let options = config.report_options();

    assert!(options.summarize_osqueries);
    assert!(options.summarize_queries_in_dataset);
    assert!(options.summarize_attributes_in_dataset);
    assert!(options.summarize_tables_in_dataset);
    assert!(!options.print_combined_data_frame);
    assert!(!options.summarize_query);
    assert!(!options.generate_json_summary);
}

#[test]
fn test_invalid_row_cap_loads_everything() {
    let yaml = "combined_case_query_data:\n  path: combined.csv\n  load_nrows: all\n";
    let config = AnalysisConfig::from_yaml_str(yaml, Path::new("test.yml")).unwrap();
    assert_eq!(config.combined_case_query_data.dataset.row_cap(), None);
}

#[test]
fn test_read_config_from_file() {
    let file = create_config_file("combined_case_query_data:\n  path: data.csv\n");
    let config = read_config(file.path()).unwrap();
    assert_eq!(
        config.combined_case_query_data.dataset.path(),
        Some(PathBuf::from("data.csv"))
    );
}

#[test]
fn test_missing_config_file_is_fatal() {
    let err = read_config(Path::new("/nonexistent/osquery_data_config.yml")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OsquerySummaryError>(),
        Some(OsquerySummaryError::ConfigReadError { .. })
    ));
}

#[test]
fn test_unparseable_config_is_fatal() {
    let file = create_config_file("combined_case_query_data: [unclosed\n");
    let err = read_config(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OsquerySummaryError>(),
        Some(OsquerySummaryError::ConfigParseError { .. })
    ));
}

#[test]
fn test_empty_config_is_invalid() {
    let file = create_config_file("   \n");
    let err = read_config(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OsquerySummaryError>(),
        Some(OsquerySummaryError::InvalidConfig { .. })
    ));
}
