//! Tolerant lookups over loosely-shaped submission responses.
//!
//! Bindings name the transaction hash and the serialized payload differently
//! across versions; the submitter treats these lookups as the last step of
//! each commit path and fails the path when nothing usable is present.

use serde_json::Value;

const HASH_KEYS: &[&str] = &["tx_hash", "txHash", "hash"];
const PAYLOAD_KEYS: &[&str] = &["tx_xdr", "txXdr", "xdr", "tx", "envelope_xdr", "envelopeXdr", "payload"];

/// Transaction hash from a sign-and-send response.
///
/// Accepts a bare string, a known hash field, or a hash nested one level
/// under `result`.
pub fn tx_hash(response: &Value) -> Option<String> {
    match response {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in HASH_KEYS {
                if let Some(Value::String(s)) = map.get(*key) {
                    if !s.is_empty() {
                        return Some(s.clone());
                    }
                }
            }
            map.get("result").and_then(tx_hash)
        }
        _ => None,
    }
}

/// Serialized unsigned payload from a build-mode response.
pub fn payload(response: &Value) -> Option<String> {
    match response {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in PAYLOAD_KEYS {
                if let Some(Value::String(s)) = map.get(*key) {
                    if !s.is_empty() {
                        return Some(s.clone());
                    }
                }
            }
            None
        }
        _ => None,
    }
}
