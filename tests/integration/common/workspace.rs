use formsynth::config::{OutputFormat, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding one schema file and an output location.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub schema: PathBuf,
    pub output: PathBuf,
}

impl TestWorkspace {
    pub fn new(schema_file: &str, content: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join(schema_file);
        fs::write(&schema, content).unwrap();
        let output = dir.path().join("generated").join("form.json");

        TestWorkspace { dir, schema, output }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::new("form-schema.json", &serde_json::to_string_pretty(&value).unwrap())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            schema: self.schema.clone(),
            output: self.output.clone(),
            format: OutputFormat::Json,
            template: None,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(&self.output).unwrap()
    }

    pub fn output_exists(&self) -> bool {
        Path::new(&self.output).exists()
    }
}

pub fn employee_schema() -> serde_json::Value {
    serde_json::json!({
        "title": "New Employee",
        "sections": [
            {
                "name": "Personal",
                "fields": [
                    { "name": "fullName", "type": "text", "label": "Full Name", "required": true },
                    { "name": "email", "type": "email", "label": "Email", "required": true },
                    {
                        "name": "phone",
                        "type": "tel",
                        "label": "Phone Number",
                        "required": true,
                        "validation": { "pattern": "^[0-9]{10}$" }
                    }
                ]
            },
            {
                "name": "Employment",
                "fields": [
                    {
                        "name": "contract",
                        "type": "select",
                        "label": "Contract",
                        "options": ["Permanent", "Fixed-term"]
                    },
                    {
                        "name": "endDate",
                        "type": "datepicker",
                        "label": "End Date",
                        "required": true,
                        "dependsOn": { "field": "contract", "value": "Fixed-term" }
                    },
                    {
                        "name": "previousJobs",
                        "type": "dynamic-array",
                        "label": "Previous Jobs",
                        "fields": [
                            { "name": "company", "type": "text", "label": "Company", "required": true },
                            { "name": "years", "type": "number", "label": "Years" }
                        ]
                    }
                ]
            }
        ],
        "actions": [
            { "type": "submit", "label": "Save" },
            { "type": "reset", "label": "Clear" }
        ]
    })
}
