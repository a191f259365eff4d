use thiserror::Error;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required setting: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if settings.schema.as_os_str().is_empty() {
            errors.push(SettingsError::MissingField("schema".to_string()));
        }

        if settings.output.as_os_str().is_empty() {
            errors.push(SettingsError::MissingField("output".to_string()));
        } else if settings.output == settings.schema {
            errors.push(SettingsError::InvalidValue {
                field: "output".to_string(),
                reason: "Output path must differ from the schema path".to_string(),
            });
        }

        if let Some(template) = &settings.template {
            if !template.is_file() {
                errors.push(SettingsError::InvalidValue {
                    field: "template".to_string(),
                    reason: format!("Template file '{}' does not exist", template.display()),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
