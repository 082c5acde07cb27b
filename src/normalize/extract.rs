//! Null-tolerant lookups over untyped JSON documents.
//!
//! Every lookup walks a dotted path key by key and short-circuits to `None`
//! on the first missing key. An explicit JSON `null` is indistinguishable
//! from an absent key. Values of the wrong type also read as `None`.

use serde_json::Value;

/// Walk `path` (dot separated object keys) through `doc`.
pub fn get<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |node, key| node.get(key))
        .filter(|v| !v.is_null())
}

pub fn text(doc: &Value, path: &str) -> Option<String> {
    match get(doc, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn number(doc: &Value, path: &str) -> Option<f64> {
    get(doc, path)?.as_f64()
}

pub fn integer(doc: &Value, path: &str) -> Option<i64> {
    let value = get(doc, path)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

pub fn flag(doc: &Value, path: &str) -> Option<bool> {
    get(doc, path)?.as_bool()
}

/// First element of the list at `path`; `None` for empty lists and non-lists
pub fn first<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    get(doc, path)?.as_array()?.first().filter(|v| !v.is_null())
}

/// Render a possibly-absent value the way it is, `null` included
pub fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => Value::Null.to_string(),
    }
}
