//! URL debug normalizer.
//!
//! The diagnostic API has answered in two shapes over time: flat camelCase
//! keys, and a `urlDebug.httpResponse` list of `{name, value}` pairs whose
//! names are the display labels. Both are read; flat keys win.

use serde_json::{Map, Value};
use tracing::debug;

use super::record::{FieldValue, Record, lookup, resolve_scalar, root_object};
use crate::error::NormalizeError;

/// Declared fields: display label and flat upstream key.
pub const FIELDS: [(&str, &str); 7] = [
    ("Edge Status Code", "statusCode"),
    ("Origin Response Code", "originStatusCode"),
    ("Origin Server Host", "originHostname"),
    ("Origin Server IP", "originIp"),
    ("Cache Setting", "cacheSetting"),
    ("CpCode", "cpCode"),
    ("Error Message (if any)", "errorMessage"),
];

/// Normalizes a URL debug response.
///
/// # Errors
///
/// Returns `NormalizeError::NotAnObject` if the root is not an object.
pub fn normalize(raw: &Value) -> Result<Record, NormalizeError> {
    let root = root_object(raw)?;
    let nested = lookup(root, &["urlDebug"]).and_then(Value::as_object);
    let pairs = lookup(root, &["urlDebug", "httpResponse"]).and_then(Value::as_array);

    let mut record = Record::new();
    for (label, key) in FIELDS {
        let value = [Some(root), nested]
            .into_iter()
            .flatten()
            .find_map(|obj| present(obj, key))
            .or_else(|| pairs.and_then(|list| pair_value(list, label)));
        record.push(label, resolve_scalar(value));
    }

    let missing = record.fields.iter().filter(|f| f.value.is_missing()).count();
    debug!(missing, "normalized urldebug response");
    Ok(record)
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn pair_value<'a>(pairs: &'a [Value], label: &str) -> Option<&'a Value> {
    pairs
        .iter()
        .filter_map(Value::as_object)
        .find(|pair| pair.get("name").and_then(Value::as_str) == Some(label))
        .and_then(|pair| pair.get("value"))
}
