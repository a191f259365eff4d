//! UI control categories

use serde::Serialize;

use super::FieldDefinition;
use crate::value::FieldValue;

/// Row hint for multi-line inputs.
pub const TEXTAREA_ROWS: u8 = 4;

/// The control a renderer should draw for a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Control {
    /// Single-line input; `input_type` is the HTML input type (text, email, tel)
    Input {
        #[serde(rename = "inputType")]
        input_type: String,
    },
    TextArea { rows: u8 },
    Number,
    /// Closed choice; the first option is always the empty one
    Select { options: Vec<ChoiceOption> },
    Checkbox,
    /// Delegated to an external date picker
    Date,
    /// Group of nested fields repeated once per runtime entry
    Repeatable { fields: Vec<FieldDefinition> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl Control {
    /// Build a select control: a leading unset option followed by each
    /// choice, with value and label identical.
    pub fn select(options: &[String]) -> Self {
        let options = std::iter::once(String::new())
            .chain(options.iter().cloned())
            .map(|o| ChoiceOption {
                value: o.clone(),
                label: o,
            })
            .collect();
        Control::Select { options }
    }

    pub fn initial_value(&self) -> FieldValue {
        match self {
            Control::Checkbox => FieldValue::Bool(false),
            Control::Repeatable { .. } => FieldValue::List(vec![]),
            _ => FieldValue::default(),
        }
    }

    /// Whether `value` has the shape this control stores: an entry list for
    /// repeatables, a flag for checkboxes, text for everything else.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Control::Repeatable { .. }, FieldValue::List(_))
                | (Control::Checkbox, FieldValue::Bool(_))
                | (
                    Control::Input { .. }
                        | Control::TextArea { .. }
                        | Control::Number
                        | Control::Select { .. }
                        | Control::Date,
                    FieldValue::Text(_)
                )
        )
    }

    /// Fit `value` to this control, or `None` when its shape is wrong.
    ///
    /// Entries of a repeatable keep only the nested fields of its template,
    /// each conformed in turn; nested values that are missing or malformed
    /// fall back to their initial value.
    pub fn conform(&self, value: FieldValue) -> Option<FieldValue> {
        if !self.accepts(&value) {
            return None;
        }
        match (self, value) {
            (Control::Repeatable { fields }, FieldValue::List(entries)) => Some(FieldValue::List(
                entries
                    .into_iter()
                    .map(|mut entry| {
                        fields
                            .iter()
                            .map(|f| {
                                let nested = entry
                                    .remove(&f.name)
                                    .and_then(|v| f.control.conform(v))
                                    .unwrap_or_else(|| f.control.initial_value());
                                (f.name.clone(), nested)
                            })
                            .collect()
                    })
                    .collect(),
            )),
            (_, value) => Some(value),
        }
    }

    /// A fresh dynamic-array entry: the nested fields' initial values.
    pub fn new_entry(&self) -> Option<crate::value::Values> {
        match self {
            Control::Repeatable { fields } => Some(
                fields
                    .iter()
                    .map(|f| (f.name.clone(), f.control.initial_value()))
                    .collect(),
            ),
            _ => None,
        }
    }
}
