//! Recursive case-normalization over a JSON payload.
//!
//! Every string value is upper-cased except:
//! - values under keys whose name contains `email`, `password`, `guid`, `id`,
//!   or `uuid` (case-insensitive), and
//! - values that themselves look like an email address or a GUID, regardless
//!   of the key they sit under.

use serde_json::Value;
use thiserror::Error;

use crate::validate::{EMAIL_RE, GUID_RE};

/// Key-name fragments whose string values are never case-normalized.
const EXCLUDED_KEY_FRAGMENTS: [&str; 5] = ["email", "password", "guid", "id", "uuid"];

/// Recursion guard; payloads are shallow, anything deeper is malformed input.
const MAX_DEPTH: usize = 64;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("payload nesting exceeds {MAX_DEPTH} levels")]
    DepthExceeded,
}

fn key_is_excluded(key: &str) -> bool {
    let lower = key.to_lowercase();
    EXCLUDED_KEY_FRAGMENTS.iter().any(|f| lower.contains(f))
}

fn value_is_protected(s: &str) -> bool {
    EMAIL_RE.is_match(s) || GUID_RE.is_match(s)
}

fn walk(value: &Value, under_excluded_key: bool, depth: usize) -> Result<Value, TransformError> {
    if depth > MAX_DEPTH {
        return Err(TransformError::DepthExceeded);
    }
    Ok(match value {
        Value::String(s) => {
            if under_excluded_key || value_is_protected(s) {
                Value::String(s.clone())
            } else {
                Value::String(s.to_uppercase())
            }
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| walk(v, under_excluded_key, depth + 1))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, v) in map {
                out.insert(key.clone(), walk(v, key_is_excluded(key), depth + 1)?);
            }
            Value::Object(out)
        }
        other => other.clone(),
    })
}

/// Upper-case all string values in `value`, honoring the key and value
/// exclusions above. Fails only on pathological nesting; callers fall back to
/// the untransformed payload in that case.
pub fn normalize_case(value: &Value) -> Result<Value, TransformError> {
    walk(value, false, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uppercases_plain_strings() {
        let out = normalize_case(&json!({"city": "austin", "nested": {"state": "tx"}})).unwrap();
        assert_eq!(out, json!({"city": "AUSTIN", "nested": {"state": "TX"}}));
    }

    #[test]
    fn test_excluded_keys_preserved() {
        let input = json!({
            "email": "Person@Example.com",
            "patient_guid": "abc-Not-Really",
            "order_id": "mixedCase",
            "password": "Secret",
            "device_uuid": "KeepMe",
        });
        assert_eq!(normalize_case(&input).unwrap(), input);
    }

    #[test]
    fn test_protected_values_under_any_key() {
        let out = normalize_case(&json!({
            "contact": "person@example.com",
            "reference": "123e4567-e89b-12d3-a456-426614174000",
        }))
        .unwrap();
        assert_eq!(out["contact"], "person@example.com");
        assert_eq!(out["reference"], "123e4567-e89b-12d3-a456-426614174000");
    }

    #[test]
    fn test_non_strings_untouched() {
        let input = json!({"count": 3, "flag": true, "missing": null});
        assert_eq!(normalize_case(&input).unwrap(), input);
    }

    #[test]
    fn test_arrays_recurse() {
        let out = normalize_case(&json!({"services": ["blood draw", "dropoff"]})).unwrap();
        assert_eq!(out["services"], json!(["BLOOD DRAW", "DROPOFF"]));
    }

    #[test]
    fn test_depth_guard() {
        let mut value = json!("leaf");
        for _ in 0..=MAX_DEPTH {
            value = json!([value]);
        }
        assert!(normalize_case(&value).is_err());
    }
}
