//! Declarative form schema.
//!
//! A schema describes a form as ordered sections of fields plus a list of
//! actions. It is authored by hand (JSON, YAML or TOML) and treated as
//! immutable input by the synthesizer.
//!
//! ## Example
//!
//! ```json
//! {
//!   "title": "New Employee",
//!   "sections": [
//!     {
//!       "name": "Personal",
//!       "fields": [
//!         { "name": "email", "type": "email", "label": "Email", "required": true },
//!         {
//!           "name": "phone",
//!           "type": "tel",
//!           "label": "Phone Number",
//!           "validation": { "pattern": "^[0-9]{10}$" }
//!         }
//!       ]
//!     }
//!   ],
//!   "actions": [{ "type": "submit", "label": "Save" }]
//! }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub mod error;
pub mod validator;

pub use error::LoadError;
pub use validator::{SchemaValidator, SchemaViolation, SchemaWarning};

/// Root of a form description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Display name of the form
    pub title: String,
    /// Sections in rendering order
    pub sections: Vec<Section>,
    /// Buttons rendered below the form, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

/// A named group of fields, rendered as one fieldset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// One input definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Form-state key; unique across the schema
    pub name: String,
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    /// Makes the field visible only while another field holds a given value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,
    /// Entry template for `dynamic-array` fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl Field {
    /// Display label, falling back to the field name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.validation.as_ref().and_then(|v| v.pattern.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldValidation {
    /// Regular expression the string value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DependsOn {
    /// Name of the controlling field
    pub field: String,
    /// Value the controlling field must hold (strict string equality)
    pub value: String,
}

/// Field type tag.
///
/// Unrecognized tags are preserved as [`FieldType::Unknown`] so a schema
/// always loads; the synthesizer emits nothing for such fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    TextArea,
    Number,
    Select,
    Checkbox,
    DatePicker,
    DynamicArray,
    Unknown(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::TextArea => "textarea",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::DatePicker => "datepicker",
            FieldType::DynamicArray => "dynamic-array",
            FieldType::Unknown(other) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unknown(_))
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "tel" => FieldType::Tel,
            "textarea" => FieldType::TextArea,
            "number" => FieldType::Number,
            "select" => FieldType::Select,
            "checkbox" => FieldType::Checkbox,
            "datepicker" => FieldType::DatePicker,
            "dynamic-array" => FieldType::DynamicArray,
            _ => FieldType::Unknown(tag),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A form-level button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Action {
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub kind: ActionKind,
    pub label: String,
}

impl Action {
    pub fn new(kind: ActionKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Submit,
    Reset,
    #[serde(other)]
    Button,
}

impl Schema {
    /// Parse a schema from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a schema file, choosing the parser by extension.
    ///
    /// `.yaml`/`.yml` and `.toml` are parsed as such; anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parsed: Result<Schema, String> = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            "toml" => toml::from_str(&content).map_err(|e| e.to_string()),
            _ => serde_json::from_str(&content).map_err(|e| e.to_string()),
        };

        let schema = parsed.map_err(|message| LoadError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!(
            "Loaded schema '{}' from {} ({} sections)",
            schema.title,
            path.display(),
            schema.sections.len()
        );
        Ok(schema)
    }

    /// JSON Schema describing the schema file format itself.
    pub fn json_schema() -> serde_json::Value {
        let root = schemars::schema_for!(Schema);
        serde_json::to_value(root).unwrap_or_default()
    }

    /// All top-level fields, section by section.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }
}
