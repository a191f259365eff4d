//! Runtime field values

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat value store keyed by field name. Dynamic-array entries use the same
/// shape, keyed by nested field name.
pub type Values = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    List(Vec<Values>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Empty text, an unchecked box, or a list with no entries.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::List(entries) => entries.is_empty(),
        }
    }

    /// String form used by dependency conditions. Lists never compare.
    pub fn as_compare_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Bool(true) => Some("true"),
            FieldValue::Bool(false) => Some("false"),
            FieldValue::List(_) => None,
        }
    }

    /// Lenient conversion from arbitrary JSON: numbers become text, `null`
    /// becomes empty text, arrays become entries (non-object items are
    /// treated as empty entries).
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::Null => FieldValue::default(),
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(map) => map
                            .iter()
                            .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                            .collect(),
                        _ => Values::new(),
                    })
                    .collect(),
            ),
            Value::Object(_) => FieldValue::Text(value.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(entries) => Value::Array(entries.iter().map(values_to_json).collect()),
        }
    }
}

pub fn values_to_json(values: &Values) -> Value {
    Value::Object(values.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::default().is_empty());
        assert!(FieldValue::Bool(false).is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::text(" ").is_empty());
        assert!(!FieldValue::Bool(true).is_empty());
    }

    #[test]
    fn test_from_json_is_lenient() {
        let value = FieldValue::from_json(&json!([{ "qty": 3, "ok": true }, "junk"]));
        let FieldValue::List(entries) = value else {
            panic!("expected list");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["qty"], FieldValue::text("3"));
        assert_eq!(entries[0]["ok"], FieldValue::Bool(true));
        assert!(entries[1].is_empty());
        assert_eq!(FieldValue::from_json(&Value::Null), FieldValue::default());
    }

    #[test]
    fn test_compare_str() {
        assert_eq!(FieldValue::Bool(true).as_compare_str(), Some("true"));
        assert_eq!(FieldValue::text("yes").as_compare_str(), Some("yes"));
        assert_eq!(FieldValue::List(vec![]).as_compare_str(), None);
    }
}
