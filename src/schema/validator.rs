use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::schema::{Field, FieldType, Schema};

/// A structural rule violation. Any violation aborts synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("Duplicate field name detected: \"{name}\" in section \"{section}\"")]
    DuplicateField { name: String, section: String },
}

/// A suspicious construct that does not block synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaWarning {
    #[error("Schema has no sections; the generated form will be empty")]
    NoSections,

    #[error("Field \"{field}\" has unknown type \"{field_type}\" and will be omitted")]
    UnknownFieldType { field: String, field_type: String },

    #[error("Select field \"{field}\" has no options")]
    SelectWithoutOptions { field: String },

    #[error("Field \"{field}\" depends on missing field \"{target}\" and will never be visible")]
    DanglingDependency { field: String, target: String },

    #[error("Field \"{field}\" depends on itself")]
    SelfDependency { field: String },

    #[error("Field \"{field}\" has an invalid pattern \"{pattern}\" ({reason}); the pattern rule is dropped")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("Dynamic array \"{field}\" has no nested fields")]
    EmptyRepeatable { field: String },

    #[error("Dynamic array \"{parent}\" repeats nested field name \"{name}\"")]
    DuplicateNestedField { parent: String, name: String },
}

pub struct SchemaValidator;

impl SchemaValidator {
    /// Check structural invariants, collecting every violation.
    ///
    /// Field-name uniqueness is the only blocking rule; everything else is
    /// reported by [`SchemaValidator::lint`].
    pub fn validate(schema: &Schema) -> Result<(), Vec<SchemaViolation>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_unique_names(schema) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_unique_names(schema: &Schema) -> Result<(), Vec<SchemaViolation>> {
        let mut errors = Vec::new();
        let mut seen_names = HashSet::new();

        for section in &schema.sections {
            for field in &section.fields {
                if !seen_names.insert(field.name.as_str()) {
                    errors.push(SchemaViolation::DuplicateField {
                        name: field.name.clone(),
                        section: section.name.clone(),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Non-blocking diagnostics, in schema order.
    pub fn lint(schema: &Schema) -> Vec<SchemaWarning> {
        let mut warnings = Vec::new();

        if schema.sections.is_empty() {
            warnings.push(SchemaWarning::NoSections);
        }

        let top_level: HashSet<&str> = schema.fields().map(|f| f.name.as_str()).collect();
        for field in schema.fields() {
            Self::lint_field(field, &top_level, &top_level, &mut warnings);
        }

        warnings
    }

    fn lint_field(
        field: &Field,
        siblings: &HashSet<&str>,
        top_level: &HashSet<&str>,
        warnings: &mut Vec<SchemaWarning>,
    ) {
        match &field.field_type {
            FieldType::Unknown(tag) => warnings.push(SchemaWarning::UnknownFieldType {
                field: field.name.clone(),
                field_type: tag.clone(),
            }),
            FieldType::Select if field.options.is_empty() => {
                warnings.push(SchemaWarning::SelectWithoutOptions {
                    field: field.name.clone(),
                })
            }
            FieldType::DynamicArray => Self::lint_repeatable(field, top_level, warnings),
            _ => {}
        }

        if let Some(dep) = &field.depends_on {
            if dep.field == field.name {
                warnings.push(SchemaWarning::SelfDependency {
                    field: field.name.clone(),
                });
            } else if !siblings.contains(dep.field.as_str()) && !top_level.contains(dep.field.as_str()) {
                warnings.push(SchemaWarning::DanglingDependency {
                    field: field.name.clone(),
                    target: dep.field.clone(),
                });
            }
        }

        if let Some(pattern) = field.pattern() {
            if let Err(e) = regex::Regex::new(pattern) {
                warnings.push(SchemaWarning::InvalidPattern {
                    field: field.name.clone(),
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn lint_repeatable(field: &Field, top_level: &HashSet<&str>, warnings: &mut Vec<SchemaWarning>) {
        if field.fields.is_empty() {
            warnings.push(SchemaWarning::EmptyRepeatable {
                field: field.name.clone(),
            });
            return;
        }

        let mut seen = HashMap::new();
        for (idx, nested) in field.fields.iter().enumerate() {
            if seen.insert(nested.name.as_str(), idx).is_some() {
                warnings.push(SchemaWarning::DuplicateNestedField {
                    parent: field.name.clone(),
                    name: nested.name.clone(),
                });
            }
        }

        let siblings: HashSet<&str> = field.fields.iter().map(|f| f.name.as_str()).collect();
        for nested in &field.fields {
            Self::lint_field(nested, &siblings, top_level, warnings);
        }
    }
}
