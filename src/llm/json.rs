use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::utils::preview;

lazy_static! {
    static ref JSON_SPAN: Regex = Regex::new(r"(?s)(\[.*\]|\{.*\})").expect("static regex");
}

/// Pull a JSON document out of model output that may be wrapped in markdown
/// fences or followed by prose. Stages run in order and the first success wins:
/// the raw text, the text with a leading ```` ```json ```` / ```` ``` ```` fence and
/// trailing fence removed, then the first bracketed span cut at its last
/// closing bracket or brace.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    if let Ok(value) = serde_json::from_str::<Value>(strip_fences(text)) {
        debug!("Parsed LLM JSON after stripping fences");
        return Some(value);
    }

    if let Some(span) = bracketed_span(text) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            debug!("Parsed LLM JSON from bracketed span");
            return Some(value);
        }
    }

    warn!("Failed to parse JSON from LLM response: {}", preview(text, 100));
    None
}

/// Like [`extract_json`] but only accepts a top-level array.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    match extract_json(text)? {
        Value::Array(items) => Some(items),
        other => {
            debug!("LLM JSON was not an array: {}", json_kind(&other));
            None
        }
    }
}

fn strip_fences(text: &str) -> &str {
    let mut clean = text.trim();
    if let Some(rest) = clean.strip_prefix("```json") {
        clean = rest;
    } else if let Some(rest) = clean.strip_prefix("```") {
        clean = rest;
    }
    if let Some(rest) = clean.strip_suffix("```") {
        clean = rest;
    }
    clean.trim()
}

fn bracketed_span(text: &str) -> Option<&str> {
    let span = JSON_SPAN.find(text)?.as_str();
    let last = span.rfind([']', '}'])?;
    Some(&span[..=last])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
