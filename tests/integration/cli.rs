use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;
use jsonapi_admin::test_utils::{ConfigFixture, DocumentFixture};

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("jsonapi-admin").unwrap();
    cmd.env_remove("JSONAPI_ADMIN_CONFIG").env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_validate_reports_collections() {
    let project = TestProject::new().unwrap();
    let config = project.write_config(ConfigFixture::TOML).unwrap();

    cli()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Books -> /books (Book)"))
        .stdout(predicate::str::contains("Person -> People"));
}

#[test]
fn test_validate_json_output() {
    let project = TestProject::new().unwrap();
    project.write_config(ConfigFixture::TOML).unwrap();

    let output = project.run_cli(&["validate", "--format", "json"]).unwrap();
    output.assert_success();
    let report = output.json();
    assert_eq!(report["valid"], true);
    assert_eq!(report["collections"][1]["name"], "People");
    assert_eq!(report["collections"][1]["default_limit"], 10);
}

#[test]
fn test_validate_rejects_unknown_formatter() {
    let project = TestProject::new().unwrap();
    let config = project
        .write_config("[[collections.Books.columns]]\ndata_field = \"title\"\nformatter = \"sparkle\"\n")
        .unwrap();

    cli()
        .args(["validate", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown formatter 'sparkle'"))
        .stderr(predicate::str::contains("toOneFormatter"));
}

#[test]
fn test_validate_missing_config() {
    let project = TestProject::new().unwrap();
    let output = project.run_cli(&["validate"]).unwrap();
    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Configuration file not found"));
    assert!(output.stderr.contains("JSONAPI_ADMIN_CONFIG"));
}

#[test]
fn test_normalize_without_config() {
    let project = TestProject::new().unwrap();
    let document = project.write_document("books.json", &DocumentFixture::books_page()).unwrap();

    let assert = cli()
        .current_dir(project.project_path())
        .args(["normalize", "--collection", "Books"])
        .arg(&document)
        .assert()
        .success()
        .stderr(predicate::str::contains("not included"));

    let records: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(records.as_array().map(Vec::len), Some(2));
    assert_eq!(records[0]["route"], "Books");
    assert_eq!(records[0]["title"], "Dune");
    assert_eq!(records[0]["author"]["attributes"]["name"], "Frank Herbert");
    assert_eq!(records[1]["tags"][1], json!({"id": "t2", "type": "Tag"}));
}

#[test]
fn test_normalize_checks_collection_against_config() {
    let project = TestProject::new().unwrap();
    project.write_config(ConfigFixture::TOML).unwrap();
    project.write_document("books.json", &DocumentFixture::books_page()).unwrap();

    let output = project.run_cli(&["normalize", "--collection", "Robots", "books.json"]).unwrap();
    assert!(!output.success);
    assert!(output.stderr.contains("Collection 'Robots' is not configured"));

    let output = project.run_cli(&["normalize", "--collection", "Books", "books.json"]).unwrap();
    output.assert_success();
}

#[test]
fn test_normalize_malformed_document() {
    let project = TestProject::new().unwrap();
    project.write_file("bad.json", r#"{"meta": {"count": 1}}"#).unwrap();

    let output = project.run_cli(&["normalize", "--collection", "Books", "bad.json"]).unwrap();
    assert!(!output.success);
    assert!(output.stderr.contains("Malformed JSON:API document"));
}

#[test]
fn test_plan_search_request() {
    let project = TestProject::new().unwrap();
    project.write_config(ConfigFixture::TOML).unwrap();

    let output = project
        .run_cli(&["plan", "--collection", "Books", "--search", "dune", "--offset", "25", "--format", "json"])
        .unwrap();
    output.assert_success();
    let plan = output.json();
    assert_eq!(plan["method"], "POST");
    assert_eq!(plan["path"], "/books/search");
    assert_eq!(plan["query"]["page[offset]"], "25");
    assert_eq!(plan["query"]["page[limit]"], "25");
    assert_eq!(plan["query"]["include"], "author,tags");
    assert_eq!(plan["body"]["meta"]["args"]["query"], "dune");
}

#[test]
fn test_plan_item_request() {
    let project = TestProject::new().unwrap();
    project.write_config(ConfigFixture::TOML).unwrap();

    let output = project.run_cli(&["plan", "--collection", "People", "--id", "9"]).unwrap();
    output.assert_success();
    assert_eq!(output.stdout.trim(), "GET /people/9");
}
