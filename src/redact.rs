//! Payload sanitization
//!
//! Strips or masks sensitive fields before a payload is stored or emitted.
//! Every routine here is total: a payload that cannot be serialized
//! degrades to a failure marker instead of an error.

use crate::constants::REDACTED;
use crate::entry::Payload;
use serde::Serialize;
use serde_json::{Map, Value};

/// Keys whose values are always replaced, matched as lowercase substrings
const SENSITIVE_KEY_PARTS: [&str; 4] = ["password", "token", "key", "secret"];

/// Field names deleted outright from user-supplied payloads
const SCRUBBED_USER_FIELDS: [&str; 5] = ["password", "token", "apiKey", "creditCard", "ssn"];

/// Convert arbitrary serializable data into a sanitized payload.
pub fn sanitize<T: Serialize + ?Sized>(data: &T) -> Payload {
    match serde_json::to_value(data) {
        Ok(value) => Payload::Json(redact_value(value)),
        Err(e) => sanitize_failure(e),
    }
}

/// Scrub a user-supplied payload: drop known-sensitive fields and mask the
/// email address, then apply the generic key redaction.
pub fn sanitize_user_data<T: Serialize + ?Sized>(data: &T) -> Payload {
    let mut value = match serde_json::to_value(data) {
        Ok(value) => value,
        Err(e) => return sanitize_failure(e),
    };

    if let Value::Object(map) = &mut value {
        for field in SCRUBBED_USER_FIELDS {
            map.remove(field);
        }
        if let Some(Value::String(email)) = map.get("email") {
            let masked = mask_email(email);
            map.insert("email".to_string(), Value::String(masked));
        }
    }

    Payload::Json(redact_value(value))
}

/// Mask an email address: first character of the local part + `***@` + domain
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => REDACTED.to_string(),
        },
        None => REDACTED.to_string(),
    }
}

/// Stable base36 label for correlating a user across entries without
/// storing the raw identifier. Not reversible, not cryptographic.
pub fn hash_user_id(id: &str) -> String {
    let mut hash: i64 = 0;
    for c in id.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(c as i64);
    }
    to_base36(hash.unsigned_abs())
}

fn sanitize_failure(e: serde_json::Error) -> Payload {
    Payload::SanitizeFailure {
        error: "Failed to sanitize data".to_string(),
        original: e.to_string(),
    }
}

/// Recursively replace values under sensitive keys with `[REDACTED]`
fn redact_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, val) in map {
                if is_sensitive_key(&key) {
                    out.insert(key, Value::String(REDACTED.to_string()));
                } else {
                    out.insert(key, redact_value(val));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(redact_value).collect()),
        other => other,
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_KEY_PARTS.iter().any(|part| lower.contains(part))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while n > 0 {
        out.insert(0, DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn sanitized_json<T: Serialize>(data: &T) -> Value {
        match sanitize(data) {
            Payload::Json(value) => value,
            other => panic!("expected Json payload, got {:?}", other),
        }
    }

    // === Key redaction ===

    #[test]
    fn test_redacts_nested_sensitive_keys() {
        let value = sanitized_json(&json!({
            "password": "x",
            "nested": { "token": "y" },
            "ok": "z",
        }));

        assert_eq!(value["password"], REDACTED);
        assert_eq!(value["nested"]["token"], REDACTED);
        assert_eq!(value["ok"], "z");
    }

    #[test]
    fn test_redacts_key_substrings_case_insensitive() {
        let value = sanitized_json(&json!({
            "ApiKey": "x",
            "REFRESH_TOKEN": "y",
            "clientSecret": "z",
            "keyboard": "also caught, key is a substring",
        }));

        assert_eq!(value["ApiKey"], REDACTED);
        assert_eq!(value["REFRESH_TOKEN"], REDACTED);
        assert_eq!(value["clientSecret"], REDACTED);
        assert_eq!(value["keyboard"], REDACTED);
    }

    #[test]
    fn test_redacts_inside_arrays() {
        let value = sanitized_json(&json!([{ "token": "a" }, { "ok": 1 }]));

        assert_eq!(value[0]["token"], REDACTED);
        assert_eq!(value[1]["ok"], 1);
    }

    #[test]
    fn test_primitives_pass_through() {
        assert_eq!(sanitized_json(&42), json!(42));
        assert_eq!(sanitized_json(&"text"), json!("text"));
        assert_eq!(sanitized_json(&json!(null)), json!(null));
    }

    #[test]
    fn test_unserializable_data_becomes_marker() {
        // Non-string map keys cannot become JSON object keys
        let mut bad = HashMap::new();
        bad.insert((1u8, 2u8), 3u8);

        match sanitize(&bad) {
            Payload::SanitizeFailure { error, original } => {
                assert_eq!(error, "Failed to sanitize data");
                assert!(!original.is_empty());
            }
            other => panic!("expected marker, got {:?}", other),
        }
    }

    // === User payload scrubbing ===

    #[test]
    fn test_user_fields_are_deleted() {
        let payload = sanitize_user_data(&json!({
            "action": "save",
            "password": "x",
            "apiKey": "y",
            "creditCard": "4111",
            "ssn": "000",
            "token": "t",
        }));

        let Payload::Json(value) = payload else {
            panic!("expected Json payload");
        };
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["action"], "save");
    }

    #[test]
    fn test_email_is_masked() {
        let payload = sanitize_user_data(&json!({ "email": "alice@example.com" }));

        let Payload::Json(value) = payload else {
            panic!("expected Json payload");
        };
        assert_eq!(value["email"], "a***@example.com");
    }

    #[test]
    fn test_mask_email_edge_cases() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("@example.com"), REDACTED);
        assert_eq!(mask_email("not-an-email"), REDACTED);
    }

    // === Identity hashing ===

    #[test]
    fn test_hash_user_id_is_stable() {
        assert_eq!(hash_user_id("user-123"), hash_user_id("user-123"));
        assert_ne!(hash_user_id("user-123"), hash_user_id("user-124"));
    }

    #[test]
    fn test_hash_user_id_is_base36() {
        let label = hash_user_id("alice@example.com");
        assert!(!label.is_empty());
        assert!(label.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_hash_empty_input() {
        assert_eq!(hash_user_id(""), "0");
    }

    // === Properties ===

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-zA-Z_]{1,10}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_total_and_idempotent(value in arb_json()) {
            let once = sanitize(&value);
            match &once {
                Payload::Json(redacted) => {
                    let twice = sanitize(redacted);
                    prop_assert_eq!(&twice, &once);
                }
                Payload::SanitizeFailure { .. } => {
                    prop_assert!(false, "JSON input must sanitize to Json");
                }
            }
        }
    }
}
