use super::common;

use clap::Parser;
use common::workspace::{employee_schema, TestWorkspace};
use formsynth::cli::Cli;
use serde_json::json;

fn cli(workspace: &TestWorkspace, extra: &[&str]) -> Cli {
    let config = workspace.path("formsynth.toml");
    let mut args = vec![
        "formsynth".to_string(),
        "--config".to_string(),
        config.to_string_lossy().into_owned(),
        "--schema".to_string(),
        workspace.schema.to_string_lossy().into_owned(),
        "--output".to_string(),
        workspace.output.to_string_lossy().into_owned(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::parse_from(args)
}

#[tokio::test]
async fn test_run_success() {
    let workspace = TestWorkspace::json(employee_schema());

    let ok = formsynth::run(cli(&workspace, &[])).await.unwrap();

    assert!(ok);
    assert!(workspace.output_exists());
}

#[tokio::test]
async fn test_run_invalid_schema_fails() {
    let workspace = TestWorkspace::json(json!({
        "title": "Broken",
        "sections": [
            { "name": "A", "fields": [{ "name": "id", "type": "text" }] },
            { "name": "B", "fields": [{ "name": "id", "type": "number" }] }
        ]
    }));

    let ok = formsynth::run(cli(&workspace, &[])).await.unwrap();

    assert!(!ok);
    assert!(!workspace.output_exists());
}

#[tokio::test]
async fn test_run_missing_schema_is_error() {
    let workspace = TestWorkspace::json(employee_schema());
    std::fs::remove_file(&workspace.schema).unwrap();

    assert!(formsynth::run(cli(&workspace, &[])).await.is_err());
}

#[tokio::test]
async fn test_run_with_values() {
    let workspace = TestWorkspace::json(employee_schema());
    let good = workspace.path("good.json");
    std::fs::write(
        &good,
        json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "0123456789",
            "contract": "Permanent",
            "previousJobs": [{ "company": "Analytical Engines", "years": 3 }]
        })
        .to_string(),
    )
    .unwrap();
    let bad = workspace.path("bad.json");
    std::fs::write(&bad, json!({ "fullName": "Ada", "phone": "12345" }).to_string()).unwrap();

    let ok = formsynth::run(cli(&workspace, &["--values", good.to_str().unwrap()])).await.unwrap();
    let failed = formsynth::run(cli(&workspace, &["--values", bad.to_str().unwrap()])).await.unwrap();

    assert!(ok);
    assert!(!failed);
}
