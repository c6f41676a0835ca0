use crate::model::{Parameter, ParameterLocation};
use serde_json::{Map, Value};
use tracing::warn;

/// Name/value object built from the non-empty path and query parameters, in
/// declaration order.
pub fn fields_object(params: &[Parameter]) -> Map<String, Value> {
    params
        .iter()
        .filter(|p| matches!(p.location, ParameterLocation::Path | ParameterLocation::Query))
        .filter(|p| p.has_value())
        .map(|p| (p.name.clone(), Value::String(p.value.clone())))
        .collect()
}

/// Serializes `value` into a query string. Nested objects use bracket keys
/// (`a[b]=c`) and arrays use indices (`a[0]=x`). Spaces are encoded as `%20`
/// (RFC 3986). Scalars at the top level have no key to go under and yield an
/// empty string.
pub fn stringify(value: &Value) -> String {
    let mut pairs = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                flatten(key, v, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(&i.to_string(), v, &mut pairs);
            }
        }
        other => warn!(value = %other, "cannot serialize a scalar into a query string"),
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, v) in &pairs {
        serializer.append_pair(key, v);
    }
    // A literal '+' is already escaped as %2B, so every '+' left is a space.
    serializer.finish().replace('+', "%20")
}

fn flatten(prefix: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                flatten(&format!("{prefix}[{key}]"), v, pairs);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(&format!("{prefix}[{i}]"), v, pairs);
            }
        }
        Value::String(s) => pairs.push((prefix.to_string(), s.clone())),
        Value::Null => pairs.push((prefix.to_string(), String::new())),
        other => pairs.push((prefix.to_string(), other.to_string())),
    }
}
