//! Per-field validation rules and their aggregate.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::value::FieldValue;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"))
}

/// A compiled `validation.pattern`. Serializes as its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// The checks derived for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub label: String,
    pub required: bool,
    /// Non-empty values must look like an email address
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub email: bool,
    /// Non-empty values must parse as a number
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub numeric: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    /// Rules applied to every dynamic-array entry
    #[serde(skip_serializing_if = "RuleSet::is_empty")]
    pub entry_rules: RuleSet,
}

impl FieldRule {
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            required,
            email: false,
            numeric: false,
            pattern: None,
            entry_rules: RuleSet::default(),
        }
    }

    /// Evaluate against a value, returning the error message if it fails.
    ///
    /// Empty values only fail the required check; format checks apply to
    /// non-empty text.
    pub fn check(&self, value: &FieldValue) -> Option<String> {
        if value.is_empty() {
            return self.required.then(|| format!("{} is required", self.label));
        }

        let FieldValue::Text(text) = value else {
            return None;
        };

        if self.email && !email_regex().is_match(text) {
            return Some(format!("{} must be a valid email", self.label));
        }
        if self.numeric && !is_finite_number(text) {
            return Some(format!("{} must be a number", self.label));
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(text) {
                return Some(format!("{} is invalid", self.label));
            }
        }
        None
    }
}

fn is_finite_number(text: &str) -> bool {
    text.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// All field rules of a form (or of one dynamic-array template), keyed by
/// field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeMap<String, FieldRule>,
}

impl RuleSet {
    pub fn insert(&mut self, name: impl Into<String>, rule: FieldRule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldRule)> {
        self.rules.iter()
    }
}
