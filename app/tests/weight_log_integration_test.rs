//! Integration tests for the weight and deficit log

mod common;

use treadmill_calc_app::error::AppError;

#[test]
fn test_log_list_and_summary() {
    let app = common::TestApp::new();
    app.run(&["log", "add", "--date", "2026-01-01", "--weight", "85", "--deficit", "500"]).unwrap();
    app.run(&["log", "add", "--date", "2026-01-03", "--weight", "84.2", "--deficit", "650"]).unwrap();
    app.run(&["log", "add", "--date", "2026-01-02", "--weight", "84.6", "--deficit", "400"]).unwrap();

    let rows = app.run_json(&["log", "list"]);
    let dates: Vec<_> = rows.as_array().unwrap().iter().map(|r| r["date"].as_str().unwrap().to_string()).collect();
    assert_eq!(dates, ["2026-01-03", "2026-01-02", "2026-01-01"]);

    let summary = app.run_json(&["log", "summary"]);
    assert_eq!(summary["total_days"], 3);
    assert_eq!(summary["entries_count"], 3);
    assert_eq!(summary["total_deficit_kcal"], 1550.0);
    assert_eq!(summary["start_weight_kg"], 85.0);
    assert_eq!(summary["current_weight_kg"], 84.2);
}

#[test]
fn test_same_date_replaces_entry() {
    let app = common::TestApp::new();
    app.run(&["log", "add", "--date", "2026-02-10", "--weight", "80", "--deficit", "100"]).unwrap();
    app.run(&["log", "add", "--date", "2026-02-10", "--weight", "79.5", "--deficit", "300"]).unwrap();

    let entry = app.run_json(&["log", "show", "2026-02-10"]);
    assert_eq!(entry["weight"], 79.5);
    assert_eq!(entry["deficit"], 300.0);
    assert_eq!(app.run_json(&["log", "list"]).as_array().unwrap().len(), 1);
}

#[test]
fn test_remove_missing_entry() {
    let app = common::TestApp::new();
    let err = app.run(&["log", "remove", "2026-02-10"]).unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn test_out_of_range_weight_is_rejected() {
    let app = common::TestApp::new();
    let err = app.run(&["log", "add", "--date", "2026-02-10", "--weight", "250"]).unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[test]
fn test_corrupt_log_reads_as_empty() {
    let app = common::TestApp::new();
    app.write_document("weight-deficit-log", r#"{"oops":true}"#);
    assert_eq!(app.run(&["log", "list"]).unwrap(), "No entries yet");
}

#[test]
fn test_export_table_and_csv() {
    let app = common::TestApp::new();
    app.run(&["log", "add", "--date", "2026-03-01", "--weight", "90", "--deficit", "0"]).unwrap();
    app.run(&["log", "add", "--date", "2026-03-08", "--weight", "88.5", "--deficit", "700"]).unwrap();

    let table = app.run(&["log", "export"]).unwrap();
    assert!(table.contains("01/03/2026"));
    assert!(table.contains("Total days: 8 (from 01/03/2026 to 08/03/2026)"));
    assert!(table.contains("Weight change: 1.5 kg in 8 days"));

    let csv_path = app.dir.path().join("export.csv");
    let out = app.run(&["log", "export", "--csv", csv_path.to_str().unwrap()]).unwrap();
    assert!(out.starts_with("Exported 2 entries"));
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        "date,weight_kg,deficit_kcal\n2026-03-01,90,0\n2026-03-08,88.5,700\n"
    );
}

#[test]
fn test_unreadable_row_does_not_erase_the_log() {
    let app = common::TestApp::new();
    app.write_document(
        "weight-deficit-log",
        r#"[{"date":"2026-01-01","weight":85,"deficit":500},{"date":"2026-01-02","weight":84.8,"deficit":null},{"date":"??","weight":84.7}]"#,
    );

    assert_eq!(app.run_json(&["log", "list"]).as_array().unwrap().len(), 2);
    app.run(&["log", "add", "--date", "2026-01-03", "--weight", "84.5"]).unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(app.document_path("weight-deficit-log")).unwrap()).unwrap();
    let dates: Vec<_> = stored.as_array().unwrap().iter().map(|r| r["date"].as_str().unwrap().to_string()).collect();
    assert_eq!(dates, ["2026-01-01", "2026-01-02", "2026-01-03"]);
    assert_eq!(stored[0]["deficit"], 500.0);
}
