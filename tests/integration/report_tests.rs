//! Tests for the shape of the summary document

use pretty_assertions::assert_eq;
use rust_osquery_summary::dataset::Dataset;
use rust_osquery_summary::report::{report_to_json_string, Section};
use rust_osquery_summary::{analyze_dataset, ReportOptions};
use serde_json::{json, Value};

use crate::common::{combined_row, query_payload, TestContext};

const SECTION_KEYS: [&str; 4] = [
    "os_query_data_analysis_stats",
    "os_query_input_query_summary",
    "os_query_table_analysis_summary",
    "os_query_attribute_analysis_summary",
];

fn dataset(payloads: &[Value]) -> Dataset {
    let headers = vec!["Query".to_string(), "Created At (UTC)".to_string()];
    let rows = payloads
        .iter()
        .map(|p| vec![p.to_string(), "2024-12-09".to_string()])
        .collect();
    Dataset::from_rows("combined", headers, rows)
}

fn section_keys(json: &Value) -> Vec<String> {
    let mut keys: Vec<String> = json["osquery_summary"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}

#[test]
fn test_disabled_sections_serialize_as_empty_objects() {
    let ctx = TestContext::new();
    ctx.write_combined(&[combined_row(
        &query_payload("Q1", "SELECT uid FROM users"),
        "['C-1']",
        "cust-a",
        "EU",
        "2024-12-09",
    )]);
    ctx.write_config(
        "  generate_json_summary: true
  summarize_osqueries: false
  summarize_queries_in_dataset: true
  summarize_attributes_in_dataset: false
  summarize_tables_in_dataset: false
",
    );
    let json = ctx.run_json();

    let mut expected: Vec<String> = SECTION_KEYS.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(section_keys(&json), expected);

    let summary = &json["osquery_summary"];
    assert_eq!(summary["os_query_data_analysis_stats"], json!({}));
    assert_eq!(summary["os_query_table_analysis_summary"], json!({}));
    assert_eq!(summary["os_query_attribute_analysis_summary"], json!({}));
    assert!(summary["os_query_input_query_summary"]["queries"].is_array());
}

#[test]
fn test_key_set_is_fixed_when_every_section_is_disabled() {
    let options = ReportOptions {
        summarize_osqueries: false,
        summarize_queries_in_dataset: false,
        summarize_attributes_in_dataset: false,
        summarize_tables_in_dataset: false,
        ..ReportOptions::all_sections()
    };
    let analysis = analyze_dataset(&dataset(&[]), &options);
    assert_eq!(
        analysis.report.osquery_summary.os_query_input_query_summary,
        Section::Disabled
    );

    let json: Value = serde_json::from_str(&report_to_json_string(&analysis.report).unwrap()).unwrap();
    assert_eq!(section_keys(&json).len(), SECTION_KEYS.len());
    for key in SECTION_KEYS {
        assert_eq!(json["osquery_summary"][key], json!({}));
    }
}

#[test]
fn test_json_uses_four_space_indent() {
    let analysis = analyze_dataset(&dataset(&[]), &ReportOptions::all_sections());
    let text = report_to_json_string(&analysis.report).unwrap();
    assert!(text.starts_with("{\n    \"osquery_summary\": {\n        \""));
}

#[test]
fn test_attribute_section() {
    let payloads = vec![
        query_payload("Q1", "SELECT pid, name AS process_name FROM processes"),
        query_payload(
            "Q2",
            "SELECT strftime('%Y', datetime(time, 'unixepoch')) AS year, GROUP_CONCAT(x) AS xs FROM events",
        ),
    ];
    let analysis = analyze_dataset(&dataset(&payloads), &ReportOptions::all_sections());
    let section = analysis
        .report
        .osquery_summary
        .os_query_attribute_analysis_summary
        .as_enabled()
        .unwrap();

    let total = section.classification.alphabetical_attributes.len()
        + section.classification.alphabetical_and_non_numeric.len()
        + section.classification.non_alphabetic.len()
        + section.classification.not_sorted.len();
    assert_eq!(total, section.unique_attribute_list.len());
    assert!(section.unique_attribute_list.contains(&"pid".to_string()));
    assert!(section.unique_attribute_list.contains(&"process_name".to_string()));
    assert!(section
        .incorrectly_parsed_attributes
        .iter()
        .all(|a| !section.unique_attribute_list.contains(a)));

    let json: Value = serde_json::to_value(section).unwrap();
    for key in [
        "alphabetical_attributes",
        "alphabetical_and_non_numeric",
        "non_alphabetic",
        "not_sorted",
        "unique_attribute_list",
        "incorrectly_parsed_attributes",
    ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
}

#[test]
fn test_case_descriptions_are_reported_per_query() {
    let payloads = vec![query_payload(
        "Risky logons",
        "SELECT user, CASE WHEN type = 10 THEN 'remote' ELSE 'local' END AS logon_kind FROM logon_sessions",
    )];
    let analysis = analyze_dataset(&dataset(&payloads), &ReportOptions::all_sections());
    let queries = &analysis
        .report
        .osquery_summary
        .os_query_input_query_summary
        .as_enabled()
        .unwrap()
        .queries;

    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].frequency_of_execution, 1);
    assert_eq!(queries[0].percentage_of_execution, 100.0);
    assert!(!queries[0].derived_case_descriptions.is_empty());
}

#[test]
fn test_empty_dataset_report() {
    let analysis = analyze_dataset(&dataset(&[]), &ReportOptions::all_sections());
    let query = analysis
        .report
        .osquery_summary
        .os_query_input_query_summary
        .as_enabled()
        .unwrap();
    assert!(query.queries.is_empty());
    assert!(query.queries_by_percentage.is_empty());

    let stats = analysis
        .report
        .osquery_summary
        .os_query_data_analysis_stats
        .as_enabled()
        .unwrap();
    assert_eq!(stats.total_number_queries_analyzed, 0);
    assert!(stats.date_range.is_empty());
}

#[test]
fn test_json_keeps_non_ascii_text() {
    let payloads = vec![query_payload("Requêtes réseau", "SELECT pid FROM processes")];
    let analysis = analyze_dataset(&dataset(&payloads), &ReportOptions::all_sections());
    let text = report_to_json_string(&analysis.report).unwrap();

    assert!(text.contains("Requêtes réseau"));
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        json["osquery_summary"]["os_query_input_query_summary"]["queries"][0]["query_name"],
        "Requêtes réseau"
    );
}
