//! Normalized record model and the shared missing-field resolution.

use serde_json::{Map, Value};

use crate::error::NormalizeError;

/// Rendered in place of any declared field that is missing upstream.
pub const PLACEHOLDER: &str = "-";

/// A leaf or nested value of a normalized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// String value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Nested records; may be empty.
    List(Vec<Record>),
    /// Declared but absent, null, or of an unexpected type upstream.
    Missing,
}

impl FieldValue {
    /// Returns the string form of a scalar value; lists have none.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Missing => Some(PLACEHOLDER.to_string()),
            Self::List(_) => None,
        }
    }

    /// Whether this value resolved to the placeholder.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// A labeled field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Display label.
    pub label: String,
    /// Resolved value.
    pub value: FieldValue,
}

/// How abbreviated mode lays out a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// `label : value`, one field per line.
    #[default]
    Aligned,
    /// Values only, one per line.
    Bare,
}

/// Ordered field set derived from an upstream payload.
///
/// Field set and order are fixed per subcommand; every declared field is
/// present even when upstream omits it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// Abbreviated-mode layout.
    pub layout: Layout,
    /// Fields in display order.
    pub fields: Vec<Field>,
}

impl Record {
    /// Creates an empty aligned record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layout: Layout::Aligned,
            fields: Vec::new(),
        }
    }

    /// Creates an empty record rendered as bare values.
    #[must_use]
    pub const fn bare() -> Self {
        Self {
            layout: Layout::Bare,
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, value: FieldValue) -> Self {
        self.push(label, value);
        self
    }

    /// Appends a field in place.
    pub fn push(&mut self, label: impl Into<String>, value: FieldValue) {
        self.fields.push(Field {
            label: label.into(),
            value,
        });
    }

    /// Looks up a field value by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| &f.value)
    }

    /// Labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.label.as_str())
    }
}

// ============================================================================
// Resolution helpers
// ============================================================================

/// Parses an upstream body into a JSON tree.
///
/// # Errors
///
/// Returns `NormalizeError::NotJson` if the body is not JSON.
pub fn parse_body(body: &[u8]) -> Result<Value, NormalizeError> {
    serde_json::from_slice(body).map_err(|e| NormalizeError::NotJson(e.to_string()))
}

/// Requires the payload root to be an object.
///
/// # Errors
///
/// Returns `NormalizeError::NotAnObject` naming the actual root type.
pub fn root_object(raw: &Value) -> Result<&Map<String, Value>, NormalizeError> {
    raw.as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(json_type_name(raw)))
}

/// Follows `path` through nested objects.
#[must_use]
pub fn lookup<'a>(obj: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(obj.get(*first)?, |node, key| node.as_object()?.get(*key))
}

/// Resolves a scalar JSON value; anything else becomes `Missing`.
///
/// Empty strings count as missing. Non-integer numbers are kept as text.
#[must_use]
pub fn resolve_scalar(value: Option<&Value>) -> FieldValue {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => FieldValue::Text(s.clone()),
        Some(Value::Number(n)) => n.as_i64().map_or_else(
            || FieldValue::Text(n.to_string()),
            FieldValue::Integer,
        ),
        Some(Value::Bool(b)) => FieldValue::Text(b.to_string()),
        _ => FieldValue::Missing,
    }
}

/// Resolves an integer; numeric strings are accepted.
#[must_use]
pub fn resolve_integer(value: Option<&Value>) -> FieldValue {
    match value {
        Some(Value::Number(n)) => n.as_i64().map_or(FieldValue::Missing, FieldValue::Integer),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_or(FieldValue::Missing, FieldValue::Integer),
        _ => FieldValue::Missing,
    }
}

/// Resolves a non-empty string; other types become `Missing`.
#[must_use]
pub fn resolve_text(value: Option<&Value>) -> FieldValue {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => FieldValue::Text(s.clone()),
        _ => FieldValue::Missing,
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
