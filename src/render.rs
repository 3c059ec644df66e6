//! Output rendering.
//!
//! Abbreviated mode prints only the normalized fields. Full JSON mode prints
//! the raw upstream payload, including detail (logs, headers) that the
//! normalized record drops.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::normalize::{FieldValue, Layout, Record};

/// Width labels are padded to in abbreviated mode.
pub const LABEL_WIDTH: usize = 22;

/// Indentation of nested list entries.
const NESTED_INDENT: &str = "  ";

/// Output selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Declared fields only, aligned `label: value`.
    #[default]
    Abbreviated,
    /// Complete upstream payload as JSON.
    FullJson,
}

/// Renders a run's result in `mode`.
///
/// # Errors
///
/// Returns a JSON error if the raw payload cannot be serialized.
pub fn render(record: &Record, raw: &Value, mode: DisplayMode) -> Result<String> {
    match mode {
        DisplayMode::Abbreviated => Ok(render_abbreviated(record)),
        DisplayMode::FullJson => render_json(raw),
    }
}

/// Renders the declared fields, one per line.
#[must_use]
pub fn render_abbreviated(record: &Record) -> String {
    let mut out = String::new();
    write_record(&mut out, record, "");
    out
}

/// Pretty-prints the raw payload with a trailing newline.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub fn render_json(raw: &Value) -> Result<String> {
    let mut out = serde_json::to_string_pretty(raw)?;
    out.push('\n');
    Ok(out)
}

/// Writes the raw payload to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn export_json(raw: &Value, path: &Path) -> Result<()> {
    std::fs::write(path, render_json(raw)?)?;
    info!(path = %path.display(), "wrote JSON export");
    Ok(())
}

fn write_record(out: &mut String, record: &Record, indent: &str) {
    for field in &record.fields {
        match (&field.value, record.layout) {
            (FieldValue::List(entries), Layout::Bare) => {
                for entry in entries {
                    write_bare(out, entry, indent);
                }
            }
            (FieldValue::List(entries), Layout::Aligned) => {
                let _ = writeln!(out, "{indent}{:<width$}:", field.label, width = LABEL_WIDTH);
                let nested = format!("{indent}{NESTED_INDENT}");
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    write_nested(out, entry, &nested);
                }
            }
            (value, Layout::Aligned) => {
                let text = value.scalar_text().unwrap_or_default();
                let _ = writeln!(out, "{indent}{:<width$}: {text}", field.label, width = LABEL_WIDTH);
            }
            (value, Layout::Bare) => {
                let text = value.scalar_text().unwrap_or_default();
                let _ = writeln!(out, "{indent}{text}");
            }
        }
    }
}

/// Values only, list entries flattened in order.
fn write_bare(out: &mut String, record: &Record, indent: &str) {
    for field in &record.fields {
        match &field.value {
            FieldValue::List(entries) => {
                for entry in entries {
                    write_bare(out, entry, indent);
                }
            }
            value => {
                let text = value.scalar_text().unwrap_or_default();
                let _ = writeln!(out, "{indent}{text}");
            }
        }
    }
}

/// Nested entries align to their own longest label.
fn write_nested(out: &mut String, record: &Record, indent: &str) {
    let width = record
        .labels()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    for field in &record.fields {
        match &field.value {
            FieldValue::List(entries) => {
                let _ = writeln!(out, "{indent}{:<width$} :", field.label);
                let nested = format!("{indent}{NESTED_INDENT}");
                for entry in entries {
                    write_nested(out, entry, &nested);
                }
            }
            value => {
                let text = value.scalar_text().unwrap_or_default();
                let _ = writeln!(out, "{indent}{:<width$} : {text}", field.label);
            }
        }
    }
}
