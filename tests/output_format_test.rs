//! Tests for the JSON output format.
//!
//! Downstream tooling consumes these field names directly, so they are
//! checked against the serialized form rather than the Rust types.

use std::path::PathBuf;

use contractscope::analysis::Analyzer;
use contractscope::batch;
use contractscope::config::Config;
use contractscope::report;
use serde_json::Value;

fn contracts_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("contracts")
}

fn run_and_get_json() -> Value {
    let root = contracts_path();
    let config = Config::default();
    let analyzer = Analyzer::from_config(&config).expect("default config should compile");

    let files = batch::collect_files(&root, &config, &analyzer).expect("should walk testdata");
    let results = batch::analyze_files(&analyzer, &files, &root, None);

    let json = report::render_json("testdata/contracts", &results).expect("should serialize");
    serde_json::from_str(&json).expect("should be valid JSON")
}

fn keys(value: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = value
        .as_object()
        .expect("should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    keys
}

#[test]
fn test_report_envelope() {
    let report = run_and_get_json();
    assert_eq!(keys(&report), vec!["files", "files_analyzed", "path", "version"]);
    assert_eq!(report["files_analyzed"], 3);

    let paths: Vec<&str> = report["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec!["anchor_vault.rs", "managed_coin.move", "native_program.rs"]
    );
}

#[test]
fn test_module_field_names() {
    let report = run_and_get_json();
    let module = &report["files"][0]["module"];

    assert_eq!(
        keys(module),
        vec![
            "complexity_metrics",
            "constants",
            "dependencies",
            "doc_comments",
            "functions",
            "imports",
            "language_features",
            "module_kind",
            "name",
            "security_insights",
            "structs",
            "total_lines",
        ]
    );
    assert_eq!(
        keys(&module["complexity_metrics"]),
        vec![
            "const_count",
            "cyclomatic_complexity",
            "function_count",
            "struct_count"
        ]
    );
}

#[test]
fn test_item_field_names() {
    let report = run_and_get_json();
    let rust = &report["files"][0]["module"];
    let move_module = &report["files"][1]["module"];

    assert_eq!(
        keys(&rust["functions"][0]),
        vec![
            "body",
            "complexity_score",
            "doc_comments",
            "is_entry_function",
            "line_number",
            "modifiers",
            "name",
            "parameters",
            "return_type",
            "visibility",
        ]
    );
    assert_eq!(keys(&rust["functions"][0]["parameters"][0]), vec!["name", "type"]);
    assert_eq!(
        keys(&rust["constants"][0]),
        vec![
            "doc_comments",
            "is_mutable",
            "line_number",
            "name",
            "type",
            "value",
            "visibility"
        ]
    );
    assert_eq!(
        keys(&move_module["structs"][0]),
        vec![
            "doc_comments",
            "fields",
            "has_copy",
            "has_drop",
            "has_key",
            "has_store",
            "line_number",
            "name"
        ]
    );
}

#[test]
fn test_enum_values() {
    let report = run_and_get_json();
    assert_eq!(report["files"][0]["module"]["module_kind"], "rust_crate");
    assert_eq!(report["files"][1]["module"]["module_kind"], "move_module");
    assert_eq!(
        report["files"][0]["module"]["functions"][0]["visibility"],
        "public"
    );
    assert_eq!(
        report["files"][1]["module"]["constants"][0]["visibility"],
        "private"
    );
}

#[test]
fn test_missing_return_type_is_null() {
    let report = run_and_get_json();
    let mint = report["files"][1]["module"]["functions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "mint")
        .unwrap();
    assert!(mint["return_type"].is_null());
}
