//! JSON-in-text column handling
//!
//! Array and object columns (`department_access`, `rules`, `teammates`, ...)
//! are stored as JSON text. Reads are lenient: a missing or malformed column
//! decodes to an empty list rather than failing the whole request.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::utils::errors::Result;

/// Decode a JSON text column, defaulting to `[]`
pub fn decode_column(raw: Option<&str>) -> Value {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed JSON column, using empty list");
            Value::Array(vec![])
        }),
        None => Value::Array(vec![]),
    }
}

/// Decode a JSON text column holding a list of strings.
///
/// Non-string elements are rendered with their JSON text.
pub fn decode_string_list(raw: Option<&str>) -> Vec<String> {
    match decode_column(raw) {
        Value::Array(items) => items.into_iter().map(value_to_string).collect(),
        Value::String(single) => vec![single],
        _ => vec![],
    }
}

/// Decode a JSON text column holding a list of arbitrary values
pub fn decode_list(raw: Option<&str>) -> Vec<Value> {
    match decode_column(raw) {
        Value::Array(items) => items,
        _ => vec![],
    }
}

/// Encode a value for storage in a JSON text column
pub fn encode_column<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Interpret a form field that should carry JSON.
///
/// Accepts a JSON document, otherwise falls back to a comma separated list.
/// Blank input yields an empty list.
pub fn parse_form_value(input: Option<&str>) -> Value {
    let Some(text) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Value::Array(vec![]);
    };

    match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => Value::Array(
            split_comma_list(text)
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
    }
}

/// Interpret a form field that should carry a list of strings
pub fn parse_form_list(input: Option<&str>) -> Vec<String> {
    match parse_form_value(input) {
        Value::Array(items) => items.into_iter().map(value_to_string).collect(),
        Value::String(single) => split_comma_list(&single),
        Value::Null => vec![],
        other => vec![value_to_string(other)],
    }
}

fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_defaults_to_empty_list() {
        assert_eq!(decode_column(None), json!([]));
        assert_eq!(decode_column(Some("")), json!([]));
        assert_eq!(decode_column(Some("{not json")), json!([]));
    }

    #[test]
    fn test_decode_keeps_objects() {
        let raw = r#"[{"time":"10:00","activity":"Opening"}]"#;
        assert_eq!(decode_column(Some(raw)), json!([{"time": "10:00", "activity": "Opening"}]));
    }

    #[test]
    fn test_decode_string_list() {
        assert_eq!(decode_string_list(Some(r#"["CSE","ECE"]"#)), vec!["CSE", "ECE"]);
        assert_eq!(decode_string_list(Some(r#""all""#)), vec!["all"]);
        assert_eq!(decode_string_list(Some("[1, 2]")), vec!["1", "2"]);
        assert!(decode_string_list(Some("{}")).is_empty());
    }

    #[test]
    fn test_parse_form_value_accepts_json_or_commas() {
        assert_eq!(parse_form_value(Some(r#"["a","b"]"#)), json!(["a", "b"]));
        assert_eq!(parse_form_value(Some("a, b ,c")), json!(["a", "b", "c"]));
        assert_eq!(parse_form_value(Some("   ")), json!([]));
        assert_eq!(parse_form_value(None), json!([]));
    }

    #[test]
    fn test_parse_form_list() {
        assert_eq!(parse_form_list(Some(r#"["CSE"]"#)), vec!["CSE"]);
        assert_eq!(parse_form_list(Some(r#""CSE, ECE""#)), vec!["CSE", "ECE"]);
        assert_eq!(parse_form_list(Some("null")), Vec::<String>::new());
    }

    #[test]
    fn test_encode_then_decode_list() {
        let heads = vec!["Asha".to_string(), "Ravi".to_string()];
        let encoded = encode_column(&heads).unwrap();
        assert_eq!(decode_string_list(Some(&encoded)), heads);
    }
}
