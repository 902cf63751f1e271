//! Request payload helpers
//!
//! Attribute values are kept verbatim. Telemetry values are flattened to
//! their string form when written.

use iotc_core::{IotcError, Result};
use serde_json::{Map, Value};

/// Accept a request body only if it is a JSON object.
pub fn into_object(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(IotcError::validation(format!(
            "Expected a JSON object of key/value pairs, got {}",
            kind(&other)
        ))),
    }
}

/// String form of a telemetry value.
///
/// Strings are unchanged, booleans and numbers use their literal text,
/// arrays and objects become compact JSON. `null` has no string form.
pub fn telemetry_string(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(number_string(n)),
        Value::Array(_) | Value::Object(_) => Ok(value.to_string()),
        Value::Null => Err(IotcError::validation(format!(
            "Telemetry value for key '{}' is null",
            key
        ))),
    }
}

fn number_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64 Display drops a zero fraction: 42.0 prints as "42"
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
