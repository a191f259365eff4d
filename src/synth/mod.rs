//! Form synthesis.
//!
//! Maps a validated [`Schema`] to a [`FormArtifact`]: for every field the
//! control to draw, its visibility predicate and its validation rule, plus the
//! initial value map and the action set. Synthesis is pure and deterministic;
//! the same schema always yields an identical artifact.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::schema::{Action, ActionKind, DependsOn, Field, FieldType, Schema};
use crate::value::{FieldValue, Values};

pub mod control;
pub mod emit;
pub mod path;
pub mod rules;

pub use control::{ChoiceOption, Control};
pub use path::FieldPath;
pub use rules::{FieldRule, Pattern, RuleSet};

/// Render-ready form definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormArtifact {
    pub title: String,
    pub sections: Vec<SectionDefinition>,
    pub initial_values: Values,
    pub rules: RuleSet,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub control: Control,
    pub visibility: Visibility,
}

/// When a field is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Visibility {
    Always,
    /// Visible while `field` currently holds exactly `value`
    WhenEquals { field: String, value: String },
}

impl Visibility {
    fn from_dependency(dep: Option<&DependsOn>) -> Self {
        match dep {
            None => Visibility::Always,
            Some(dep) => Visibility::WhenEquals {
                field: dep.field.clone(),
                value: dep.value.clone(),
            },
        }
    }

    /// Evaluate against the current values.
    ///
    /// `scope` holds the values the field lives in (the form, or one
    /// dynamic-array entry); `outer` is the enclosing form for nested fields.
    /// A controlling field that exists in neither never matches.
    pub fn evaluate(&self, scope: &Values, outer: Option<&Values>) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::WhenEquals { field, value } => scope
                .get(field)
                .or_else(|| outer.and_then(|o| o.get(field)))
                .and_then(FieldValue::as_compare_str)
                .map(|current| current == value)
                .unwrap_or(false),
        }
    }
}

/// Synthesize a form from a schema that already passed
/// [`SchemaValidator::validate`](crate::schema::SchemaValidator::validate).
pub fn synthesize(schema: &Schema) -> FormArtifact {
    let mut initial_values = Values::new();
    let mut rules = RuleSet::default();

    let sections = schema
        .sections
        .iter()
        .map(|section| SectionDefinition {
            name: section.name.clone(),
            fields: section
                .fields
                .iter()
                .filter_map(|field| synthesize_field(field, &mut initial_values, &mut rules))
                .collect(),
        })
        .collect();

    let actions = if schema.actions.is_empty() {
        vec![
            Action::new(ActionKind::Submit, "Submit"),
            Action::new(ActionKind::Reset, "Reset"),
        ]
    } else {
        schema.actions.clone()
    };

    FormArtifact {
        title: schema.title.clone(),
        sections,
        initial_values,
        rules,
        actions,
    }
}

/// Build one field's definition, registering its initial value and rule.
/// Unknown types yield nothing.
fn synthesize_field(field: &Field, initial_values: &mut Values, rules: &mut RuleSet) -> Option<FieldDefinition> {
    let mut rule = FieldRule::new(field.label(), field.required);

    let control = match &field.field_type {
        FieldType::Text | FieldType::Email | FieldType::Tel => Control::Input {
            input_type: field.field_type.as_str().to_string(),
        },
        FieldType::TextArea => Control::TextArea {
            rows: control::TEXTAREA_ROWS,
        },
        FieldType::Number => Control::Number,
        FieldType::Select => Control::select(&field.options),
        FieldType::Checkbox => Control::Checkbox,
        FieldType::DatePicker => Control::Date,
        FieldType::DynamicArray => {
            let mut entry_defaults = Values::new();
            let fields = field
                .fields
                .iter()
                .filter_map(|nested| synthesize_field(nested, &mut entry_defaults, &mut rule.entry_rules))
                .collect();
            Control::Repeatable { fields }
        }
        FieldType::Unknown(tag) => {
            debug!("Skipping field '{}' with unknown type '{}'", field.name, tag);
            return None;
        }
    };

    rule.email = field.field_type == FieldType::Email;
    rule.numeric = field.field_type == FieldType::Number;
    rule.pattern = field.pattern().and_then(|source| match Pattern::new(source) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            debug!("Dropping invalid pattern on '{}': {}", field.name, e);
            None
        }
    });

    initial_values.insert(field.name.clone(), control.initial_value());
    rules.insert(field.name.clone(), rule);

    Some(FieldDefinition {
        name: field.name.clone(),
        label: field.label().to_string(),
        required: field.required,
        placeholder: field.placeholder.clone(),
        control,
        visibility: Visibility::from_dependency(field.depends_on.as_ref()),
    })
}

impl FormArtifact {
    /// All top-level field definitions in rendering order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().find(|f| f.name == name)
    }

    /// Run every rule against `values`, keyed by field path.
    ///
    /// Hidden fields are skipped. Dynamic-array entries are checked with the
    /// nested rules and reported as `name[index].nested`.
    pub fn validate(&self, values: &Values) -> BTreeMap<String, String> {
        self.check(values)
            .into_iter()
            .map(|e| (e.path.to_string(), e.message))
            .collect()
    }

    /// Like [`FormArtifact::validate`], keeping the structured path of each
    /// failure.
    pub fn check(&self, values: &Values) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_fields(self.fields(), &self.rules, values, None, &FieldPath::root(), &mut errors);
        errors
    }
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
}

fn check_fields<'a>(
    fields: impl Iterator<Item = &'a FieldDefinition>,
    rules: &RuleSet,
    scope: &Values,
    outer: Option<&Values>,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
) {
    let empty = FieldValue::default();

    for field in fields {
        if !field.visibility.evaluate(scope, outer) {
            continue;
        }
        let Some(rule) = rules.get(&field.name) else {
            continue;
        };
        let field_path = path.push_field(&field.name);
        let value = scope.get(&field.name).unwrap_or(&empty);

        if !field.control.accepts(value) {
            errors.push(FieldError {
                path: field_path,
                message: format!("{} is invalid", rule.label),
            });
            continue;
        }

        if let Some(message) = rule.check(value) {
            errors.push(FieldError {
                path: field_path.clone(),
                message,
            });
        }

        if let (Control::Repeatable { fields: nested }, FieldValue::List(entries)) = (&field.control, value) {
            for (idx, entry) in entries.iter().enumerate() {
                check_fields(
                    nested.iter(),
                    &rule.entry_rules,
                    entry,
                    Some(scope),
                    &field_path.push_index(idx),
                    errors,
                );
            }
        }
    }
}
