//! Property origin normalizer.
//!
//! Walks a property rule tree and lists the hostname of every `origin`
//! behavior, in tree order. Origins defined under rules that never match
//! live traffic are listed too: the rule tree alone cannot tell which
//! origins are actually used.

use serde_json::{Map, Value};
use tracing::debug;

use super::record::{FieldValue, Record, lookup, resolve_text, root_object};
use crate::error::NormalizeError;

/// Label of the single field holding the origin list.
pub const ORIGINS_LABEL: &str = "Origins";

/// Label carried by each origin entry.
pub const HOSTNAME_LABEL: &str = "Hostname";

/// Normalizes a rule tree response into the origin hostname list.
///
/// The record always has exactly one field, [`ORIGINS_LABEL`], whose list
/// may be empty.
///
/// # Errors
///
/// Returns `NormalizeError::NotAnObject` if the root is not an object.
pub fn normalize(raw: &Value) -> Result<Record, NormalizeError> {
    let root = root_object(raw)?;

    let mut behaviors = Vec::new();
    if let Some(rule) = lookup(root, &["rules"]).and_then(Value::as_object) {
        collect_origin_behaviors(rule, &mut behaviors);
    }

    let entries: Vec<Record> = behaviors
        .into_iter()
        .map(|behavior| Record::bare().with(HOSTNAME_LABEL, origin_hostname(behavior)))
        .collect();

    debug!(origins = entries.len(), "normalized origins response");
    Ok(Record::bare().with(ORIGINS_LABEL, FieldValue::List(entries)))
}

/// Depth-first: a rule's own behaviors, then each child in order.
fn collect_origin_behaviors<'a>(
    rule: &'a Map<String, Value>,
    out: &mut Vec<&'a Map<String, Value>>,
) {
    let behaviors = rule.get("behaviors").and_then(Value::as_array);
    out.extend(
        behaviors
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .filter(|b| b.get("name").and_then(Value::as_str) == Some("origin")),
    );

    let children = rule.get("children").and_then(Value::as_array);
    for child in children.into_iter().flatten().filter_map(Value::as_object) {
        collect_origin_behaviors(child, out);
    }
}

fn origin_hostname(behavior: &Map<String, Value>) -> FieldValue {
    let Some(options) = behavior.get("options").and_then(Value::as_object) else {
        return FieldValue::Missing;
    };

    match options.get("originType").and_then(Value::as_str) {
        Some("NET_STORAGE") => {
            resolve_text(lookup(options, &["netStorage", "downloadDomainName"]))
        }
        _ => resolve_text(options.get("hostname")),
    }
}
