use std::fmt::Write;
use std::str::FromStr;

use harvest_core::{ExtractedData, FieldValue};
use serde::Serialize;

/// Output format for extracted fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, text", s)),
        }
    }
}

#[derive(Serialize)]
struct Output<'a> {
    data: &'a ExtractedData,
}

/// Render as `{"data": {...}}`, the same shape the server answers with.
pub fn to_json(data: &ExtractedData, pretty: bool) -> serde_json::Result<String> {
    let response = Output { data };
    let mut json = if pretty { serde_json::to_string_pretty(&response)? } else { serde_json::to_string(&response)? };
    json.push('\n');
    Ok(json)
}

/// One `name: value` line per field; lists become indented bullets.
pub fn to_text(data: &ExtractedData) -> String {
    let mut out = String::new();

    for (field, value) in data {
        match value {
            FieldValue::Null => {
                let _ = writeln!(out, "{}: (no match)", field);
            }
            FieldValue::Text(text) => {
                let _ = writeln!(out, "{}: {}", field, text);
            }
            FieldValue::List(items) => {
                let _ = writeln!(out, "{}:", field);
                for item in items {
                    let _ = writeln!(out, "  - {}", item);
                }
            }
        }
    }

    out
}
