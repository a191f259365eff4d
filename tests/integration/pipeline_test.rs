use super::common;

use common::workspace::{employee_schema, TestWorkspace};
use formsynth::config::OutputFormat;
use formsynth::pipeline::{self, PipelineError};
use formsynth::schema::{LoadError, SchemaViolation};
use serde_json::json;

#[test]
fn test_duplicate_field_aborts_without_output() {
    let workspace = TestWorkspace::json(json!({
        "title": "Broken",
        "sections": [{
            "name": "Personal",
            "fields": [
                { "name": "email", "type": "email", "label": "Email" },
                { "name": "email", "type": "email", "label": "Work Email" }
            ]
        }]
    }));

    let result = pipeline::generate(&workspace.settings(), false);

    match result {
        Err(PipelineError::Invalid(violations)) => {
            assert_eq!(
                violations,
                vec![SchemaViolation::DuplicateField {
                    name: "email".into(),
                    section: "Personal".into(),
                }]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert!(!workspace.output_exists());
}

#[test]
fn test_generate_writes_artifact() {
    let workspace = TestWorkspace::json(employee_schema());

    let outcome = pipeline::generate(&workspace.settings(), false).unwrap();
    assert_eq!(outcome.written.as_deref(), Some(workspace.output.as_path()));

    let artifact: serde_json::Value = serde_json::from_str(&workspace.read_output()).unwrap();
    assert_eq!(artifact["title"], "New Employee");
    assert_eq!(artifact["sections"][1]["fields"][0]["control"]["kind"], "select");
    assert_eq!(
        artifact["sections"][1]["fields"][1]["visibility"],
        json!({ "kind": "when-equals", "field": "contract", "value": "Fixed-term" })
    );
    assert_eq!(artifact["initialValues"]["previousJobs"], json!([]));
    assert_eq!(artifact["rules"]["phone"]["pattern"], "^[0-9]{10}$");
    assert_eq!(artifact["actions"][1], json!({ "type": "reset", "label": "Clear" }));
}

#[test]
fn test_reruns_are_byte_identical() {
    let workspace = TestWorkspace::json(employee_schema());

    pipeline::generate(&workspace.settings(), false).unwrap();
    let first = workspace.read_output();
    pipeline::generate(&workspace.settings(), false).unwrap();
    let second = workspace.read_output();

    assert_eq!(first, second);
}

#[test]
fn test_check_writes_nothing() {
    let workspace = TestWorkspace::json(employee_schema());

    let outcome = pipeline::generate(&workspace.settings(), true).unwrap();

    assert!(outcome.written.is_none());
    assert!(!outcome.rendered.is_empty());
    assert!(!workspace.output_exists());
}

#[test]
fn test_yaml_and_json_schemas_agree() {
    let yaml = serde_yaml::to_string(&employee_schema()).unwrap();
    let from_yaml = TestWorkspace::new("form-schema.yaml", &yaml);
    let from_json = TestWorkspace::json(employee_schema());

    let a = pipeline::generate(&from_yaml.settings(), true).unwrap();
    let b = pipeline::generate(&from_json.settings(), true).unwrap();

    assert_eq!(a.rendered, b.rendered);
}

#[test]
fn test_html_output() {
    let workspace = TestWorkspace::json(employee_schema());
    let mut settings = workspace.settings();
    settings.format = OutputFormat::Html;
    settings.output = workspace.path("site/form.html");

    pipeline::generate(&settings, false).unwrap();
    let html = std::fs::read_to_string(&settings.output).unwrap();

    assert!(html.contains("<legend>Employment</legend>"));
    assert!(html.contains("<button type=\"reset\">Clear</button>"));
}

#[test]
fn test_custom_template() {
    let workspace = TestWorkspace::json(employee_schema());
    let template = workspace.path("fields.txt.tera");
    std::fs::write(
        &template,
        "{% for s in form.sections %}{% for f in s.fields %}{{ f.name }}\n{% endfor %}{% endfor %}",
    )
    .unwrap();

    let mut settings = workspace.settings();
    settings.template = Some(template);
    let outcome = pipeline::generate(&settings, true).unwrap();

    assert_eq!(outcome.rendered, "fullName\nemail\nphone\ncontract\nendDate\npreviousJobs\n");
}

#[test]
fn test_missing_schema_file() {
    let workspace = TestWorkspace::json(employee_schema());
    let mut settings = workspace.settings();
    settings.schema = workspace.path("nope.json");

    let result = pipeline::generate(&settings, false);
    assert!(matches!(result, Err(PipelineError::Load(LoadError::Read { .. }))));
}

#[test]
fn test_malformed_schema_file() {
    let workspace = TestWorkspace::new("form-schema.json", "{ \"title\": ");

    let result = pipeline::generate(&workspace.settings(), false);
    assert!(matches!(result, Err(PipelineError::Load(LoadError::Parse { .. }))));
    assert!(!workspace.output_exists());
}
