//! Loose JSON truthiness used by the request context code.
use serde_json::Value;

/// Loose truthiness: `null`, `false`, `0`, `""`, `"0"`, `[]` and `{}` are empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
