//! Response-shape normalization.
//!
//! Generated bindings wrap results inconsistently across contract versions:
//! bare values, `{"result": …}`, `{"ok": …}` / `{"error": …}`, `{"val": …}`,
//! and tagged option/result shapes (`{"tag": "some", "values": …}`). All
//! reads funnel through [`unwrap`] so the facades only ever see the inner
//! value, and every tolerant scalar decode lives here.

use serde_json::Value;

use crate::client::ClientError;

/// Peel nested result/ok/val wrappers down to the inner value.
///
/// An error envelope (`{"error": …}` or `{"tag": "err", …}`) becomes
/// [`ClientError::Execution`]; a none-tagged option becomes `Value::Null`.
pub fn unwrap(value: Value) -> Result<Value, ClientError> {
    let mut current = value;
    loop {
        let mut map = match current {
            Value::Object(map) => map,
            other => return Ok(other),
        };
        if let Some(detail) = map.remove("error") {
            return Err(ClientError::Execution(detail.to_string()));
        }
        if let Some(inner) = map.remove("result") {
            current = inner;
            continue;
        }
        if let Some(inner) = map.remove("ok") {
            current = inner;
            continue;
        }
        if let Some(inner) = map.remove("val") {
            current = inner;
            continue;
        }
        let tag = map.get("tag").and_then(Value::as_str).map(str::to_owned);
        match tag.as_deref() {
            Some("none") | Some("void") => return Ok(Value::Null),
            Some("some") | Some("ok") => {
                let inner = map.remove("values").unwrap_or(Value::Null);
                current = flatten_values(inner);
                continue;
            }
            Some("err") => {
                let detail = map.remove("values").unwrap_or(Value::Null);
                return Err(ClientError::Execution(detail.to_string()));
            }
            _ => return Ok(Value::Object(map)),
        }
    }
}

/// Tagged shapes carry their payload as a one-element `values` array.
fn flatten_values(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    }
}

/// Decode an unsigned 64-bit integer from a number or digit string.
///
/// Negative and fractional numbers are rejected, matching the bounded-integer
/// rules applied to inputs.
pub fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode an unsigned 32-bit integer; fails on overflow.
pub fn as_u32(value: &Value) -> Option<u32> {
    as_u64(value).and_then(|n| u32::try_from(n).ok())
}

/// Decode a string value. Numbers are not coerced.
pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Loose truth test matching how the original bindings report flags:
/// null is false, numbers by zero-ness, strings by emptiness, containers true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Treat a value as a list of items; null reads as an empty list.
pub fn into_items(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Null => Some(Vec::new()),
        _ => None,
    }
}

/// First present key of `keys` in an object value.
pub fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = value.as_object()?;
    keys.iter().find_map(|key| map.get(*key))
}

/// String at the first present key, empty when absent.
pub fn string_field(value: &Value, keys: &[&str]) -> String {
    field(value, keys).and_then(as_string).unwrap_or_default()
}

/// u64 at the first present key.
pub fn u64_field(value: &Value, keys: &[&str]) -> Option<u64> {
    field(value, keys).and_then(as_u64)
}

/// u32 at the first present key.
pub fn u32_field(value: &Value, keys: &[&str]) -> Option<u32> {
    field(value, keys).and_then(as_u32)
}

/// Boolean at the first present key, false when absent.
pub fn bool_field(value: &Value, keys: &[&str]) -> bool {
    field(value, keys).map(truthy).unwrap_or(false)
}

/// Key/value entries of a map-shaped response.
///
/// Accepts a JSON object or an array of `[key, value]` pairs; both shapes
/// occur in the wild for the same logical map.
pub fn entries(value: Value) -> Option<Vec<(Value, Value)>> {
    match value {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(key, inner)| (Value::String(key), inner))
                .collect(),
        ),
        Value::Array(items) => {
            let mut pairs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Array(mut pair) if pair.len() == 2 => {
                        let inner = pair.remove(1);
                        let key = pair.remove(0);
                        pairs.push((key, inner));
                    }
                    _ => return None,
                }
            }
            Some(pairs)
        }
        Value::Null => Some(Vec::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_common_shapes() {
        assert_eq!(unwrap(json!(7)).unwrap(), json!(7));
        assert_eq!(unwrap(json!({"result": 7})).unwrap(), json!(7));
        assert_eq!(unwrap(json!({"result": {"ok": 7}})).unwrap(), json!(7));
        assert_eq!(unwrap(json!({"val": [1, 2]})).unwrap(), json!([1, 2]));
        assert_eq!(
            unwrap(json!({"tag": "some", "values": ["x"]})).unwrap(),
            json!("x")
        );
        assert_eq!(unwrap(json!({"tag": "none"})).unwrap(), Value::Null);
    }

    #[test]
    fn test_unwrap_passes_plain_objects_through() {
        let proposal = json!({"id": 1, "title": "t"});
        assert_eq!(unwrap(proposal.clone()).unwrap(), proposal);
    }

    #[test]
    fn test_unwrap_error_envelopes() {
        assert!(matches!(
            unwrap(json!({"error": "boom"})),
            Err(ClientError::Execution(_))
        ));
        assert!(matches!(
            unwrap(json!({"result": {"tag": "err", "values": [3]}})),
            Err(ClientError::Execution(_))
        ));
    }

    #[test]
    fn test_scalar_decodes() {
        assert_eq!(as_u64(&json!(5)), Some(5));
        assert_eq!(as_u64(&json!("12")), Some(12));
        assert_eq!(as_u64(&json!(-3)), None);
        assert_eq!(as_u64(&json!(1.5)), None);
        assert_eq!(as_u32(&json!(u64::from(u32::MAX) + 1)), None);
        assert_eq!(as_string(&json!(5)), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!({"any": 1})));
    }

    #[test]
    fn test_entries_accepts_both_map_shapes() {
        let from_object = entries(json!({"1": ["a"]})).unwrap();
        assert_eq!(from_object, vec![(json!("1"), json!(["a"]))]);

        let from_pairs = entries(json!([[1, ["a"]], [2, ["b"]]])).unwrap();
        assert_eq!(from_pairs.len(), 2);
        assert_eq!(from_pairs[0], (json!(1), json!(["a"])));

        assert!(entries(json!("nope")).is_none());
    }

    #[test]
    fn test_field_lookup_order() {
        let token = json!({"uri": "ipfs://x", "address": "GABC"});
        assert_eq!(string_field(&token, &["metadata", "uri"]), "ipfs://x");
        assert_eq!(string_field(&token, &["owner", "address"]), "GABC");
        assert_eq!(string_field(&token, &["missing"]), "");
    }
}
