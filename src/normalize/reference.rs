//! Error reference normalizer.

use serde_json::{Map, Value};
use tracing::debug;

use super::record::{
    FieldValue, Record, lookup, resolve_integer, resolve_scalar, resolve_text, root_object,
};
use crate::error::NormalizeError;

/// Suffix of the sibling object carrying geo data for an IP field.
const LOCATION_SUFFIX: &str = "Location";

/// Label of the WAF detail section.
pub const WAF_LABEL: &str = "WAF Details";

/// Normalizes a translated-error response.
///
/// Reads from `translatedError`, or from the root when that wrapper is
/// absent.
///
/// # Errors
///
/// Returns `NormalizeError::NotAnObject` if the root is not an object.
pub fn normalize(raw: &Value) -> Result<Record, NormalizeError> {
    let root = root_object(raw)?;
    let te = lookup(root, &["translatedError"])
        .and_then(Value::as_object)
        .unwrap_or(root);

    let record = Record::new()
        .with("URL", resolve_text(te.get("url")))
        .with("HTTP Response Code", resolve_scalar(te.get("httpResponseCode")))
        .with("Timestamp", resolve_text(te.get("timestamp")))
        .with("Epoch Time", resolve_integer(te.get("epochTime")))
        .with("Client IP", annotated_ip(te, "clientIp"))
        .with("Connecting IP", annotated_ip(te, "connectingIp"))
        .with("Server IP", annotated_ip(te, "serverIp"))
        .with("User Agent", resolve_text(te.get("userAgent")))
        .with("Request Method", resolve_text(te.get("requestMethod")))
        .with("Reason For Failure", resolve_text(te.get("reasonForFailure")))
        .with(WAF_LABEL, FieldValue::List(waf_details(te.get("wafDetails"))));

    debug!(
        wrapped = root.contains_key("translatedError"),
        "normalized reference response"
    );
    Ok(record)
}

/// Resolves an IP and appends `(city, region, country)` when upstream has it.
///
/// The IP may be a plain string with geo in `<key>Location`, or an object
/// with an `ip` member and the geo fields inline.
fn annotated_ip(te: &Map<String, Value>, key: &str) -> FieldValue {
    let (ip, geo) = match te.get(key) {
        Some(Value::Object(inline)) => (inline.get("ip"), Some(inline)),
        other => (
            other,
            te.get(&format!("{key}{LOCATION_SUFFIX}"))
                .and_then(Value::as_object),
        ),
    };

    let FieldValue::Text(ip) = resolve_text(ip) else {
        return FieldValue::Missing;
    };

    let parts: Vec<&str> = geo
        .map(|g| {
            [
                &["city"][..],
                &["regionCode", "region"][..],
                &["countryCode", "country"][..],
            ]
            .iter()
            .filter_map(|keys| {
                keys.iter()
                    .find_map(|k| g.get(*k).and_then(Value::as_str))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .collect()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        FieldValue::Text(ip)
    } else {
        FieldValue::Text(format!("{ip} ({})", parts.join(", ")))
    }
}

/// Flattens WAF detail entries into records, preserving upstream key order.
fn waf_details(value: Option<&Value>) -> Vec<Record> {
    match value {
        Some(Value::Array(items)) => items.iter().map(waf_entry).collect(),
        Some(Value::Object(_)) => value.map(waf_entry).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn waf_entry(item: &Value) -> Record {
    match item {
        Value::Object(obj) => obj.iter().fold(Record::new(), |record, (key, v)| {
            let resolved = match v {
                Value::Array(_) | Value::Object(_) => FieldValue::Text(v.to_string()),
                _ => resolve_scalar(Some(v)),
            };
            record.with(key.as_str(), resolved)
        }),
        other => Record::new().with("value", resolve_scalar(Some(other))),
    }
}
