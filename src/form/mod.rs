//! Runtime form model.
//!
//! [`FormState`] is immutable per update: every [`FormEvent`] produces a new
//! state through [`FormState::apply`], re-running validation against the
//! artifact's rules. Errors are only surfaced for touched fields.

use std::collections::{BTreeMap, BTreeSet};

use crate::synth::{Control, FieldDefinition, FormArtifact};
use crate::value::{values_to_json, FieldValue, Values};

pub mod submit;

pub use submit::{submit, LoggingSubmitHandler, SubmitError, SubmitPort, SubmitReceipt};

/// A user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Change { field: String, value: FieldValue },
    Blur { field: String },
    /// Append a blank entry to a dynamic array
    AddEntry { field: String },
    /// Splice the entry at `index` out of a dynamic array
    RemoveEntry { field: String, index: usize },
    ChangeEntry {
        field: String,
        index: usize,
        nested: String,
        value: FieldValue,
    },
    /// Marks every field touched
    SubmitAttempt,
    /// Back to the initial values, nothing touched
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: Values,
    touched: BTreeSet<String>,
    errors: BTreeMap<String, String>,
    /// Error key to the top-level field it belongs to
    error_owners: BTreeMap<String, String>,
    submit_count: u32,
}

fn validate(artifact: &FormArtifact, values: &Values) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let mut errors = BTreeMap::new();
    let mut owners = BTreeMap::new();
    for error in artifact.check(values) {
        let key = error.path.to_string();
        if let Some(field) = error.path.top_field() {
            owners.insert(key.clone(), field.to_string());
        }
        errors.insert(key, error.message);
    }
    (errors, owners)
}

impl FormState {
    pub fn new(artifact: &FormArtifact) -> Self {
        let values = artifact.initial_values.clone();
        let (errors, error_owners) = validate(artifact, &values);
        Self {
            values,
            touched: BTreeSet::new(),
            errors,
            error_owners,
            submit_count: 0,
        }
    }

    /// Apply one event, returning the next state.
    ///
    /// Events naming unknown fields, values of the wrong shape for the
    /// field's control, non-array fields for entry operations, unknown
    /// nested fields or out-of-range entry indices leave the state unchanged.
    pub fn apply(&self, artifact: &FormArtifact, event: FormEvent) -> Self {
        let mut next = self.clone();

        match event {
            FormEvent::Change { field, value } => {
                let Some(value) = artifact.field(&field).and_then(|def| def.control.conform(value)) else {
                    return next;
                };
                next.values.insert(field.clone(), value);
                next.touched.insert(field);
            }
            FormEvent::Blur { field } => {
                if artifact.field(&field).is_none() {
                    return next;
                }
                next.touched.insert(field);
            }
            FormEvent::AddEntry { field } => {
                let Some(entry) = artifact.field(&field).and_then(|def| def.control.new_entry()) else {
                    return next;
                };
                match next.values.get_mut(&field) {
                    Some(FieldValue::List(entries)) => entries.push(entry),
                    _ => {
                        next.values.insert(field.clone(), FieldValue::List(vec![entry]));
                    }
                }
                next.touched.insert(field);
            }
            FormEvent::RemoveEntry { field, index } => {
                match next.values.get_mut(&field) {
                    Some(FieldValue::List(entries)) if index < entries.len() => {
                        entries.remove(index);
                    }
                    _ => return next,
                }
                next.touched.insert(field);
            }
            FormEvent::ChangeEntry {
                field,
                index,
                nested,
                value,
            } => {
                let Some(value) = entry_field(artifact, &field, &nested).and_then(|def| def.control.conform(value))
                else {
                    return next;
                };
                match next.values.get_mut(&field) {
                    Some(FieldValue::List(entries)) if index < entries.len() => {
                        entries[index].insert(nested, value);
                    }
                    _ => return next,
                }
                next.touched.insert(field);
            }
            FormEvent::SubmitAttempt => {
                next.touched.extend(artifact.fields().map(|f| f.name.clone()));
                next.submit_count += 1;
            }
            FormEvent::Reset => return FormState::new(artifact),
        }

        (next.errors, next.error_owners) = validate(artifact, &next.values);
        next
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Every current error, touched or not, keyed by field path.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error text to show for `key`, or `None` while its field is untouched.
    pub fn visible_error(&self, key: &str) -> Option<&str> {
        if !self.is_error_touched(key) {
            return None;
        }
        self.errors.get(key).map(String::as_str)
    }

    /// Errors of touched fields only.
    pub fn visible_errors(&self) -> BTreeMap<&str, &str> {
        self.errors
            .iter()
            .filter(|(key, _)| self.is_error_touched(key))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    fn is_error_touched(&self, key: &str) -> bool {
        self.error_owners
            .get(key)
            .map(|field| self.is_touched(field))
            .unwrap_or(false)
    }

    /// Whether a top-level field is currently shown.
    pub fn is_visible(&self, artifact: &FormArtifact, field: &str) -> bool {
        artifact
            .field(field)
            .map(|def| def.visibility.evaluate(&self.values, None))
            .unwrap_or(false)
    }

    /// Whether `nested` is shown inside entry `index` of dynamic array `field`.
    ///
    /// Dependencies resolve against the entry first, then the whole form.
    pub fn is_entry_field_visible(&self, artifact: &FormArtifact, field: &str, index: usize, nested: &str) -> bool {
        let Some(def) = entry_field(artifact, field, nested) else {
            return false;
        };
        match self.values.get(field) {
            Some(FieldValue::List(entries)) => entries
                .get(index)
                .map(|entry| def.visibility.evaluate(entry, Some(&self.values)))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// The value map handed to the submit collaborator.
    pub fn payload(&self) -> serde_json::Value {
        values_to_json(&self.values)
    }
}

/// The nested definition `nested` of dynamic array `field`.
fn entry_field<'a>(artifact: &'a FormArtifact, field: &str, nested: &str) -> Option<&'a FieldDefinition> {
    match &artifact.field(field)?.control {
        Control::Repeatable { fields } => fields.iter().find(|f| f.name == nested),
        _ => None,
    }
}
