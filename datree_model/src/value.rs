//! Shape checks over the generic value tree. Every helper records a located
//! issue on failure and returns `None` so callers can keep walking siblings.

use datree_ids::{Guid, RefId};
use serde_json::{Map, Value};

use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;

pub(crate) fn join_path(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

pub(crate) fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

pub(crate) fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    issues: &mut Issues,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(map) => Some(map),
        None => {
            issues.push(path, "expected an object");
            None
        }
    }
}

pub(crate) fn expect_array<'a>(
    value: &'a Value,
    path: &str,
    issues: &mut Issues,
) -> Option<&'a Vec<Value>> {
    match value.as_array() {
        Some(array) => Some(array),
        None => {
            issues.push(path, "expected an array");
            None
        }
    }
}

pub(crate) fn expect_str<'a>(
    value: &'a Value,
    path: &str,
    issues: &mut Issues,
) -> Option<&'a str> {
    match value.as_str() {
        Some(s) => Some(s),
        None => {
            issues.push(path, "expected a string");
            None
        }
    }
}

pub(crate) fn expect_bool(value: &Value, path: &str, issues: &mut Issues) -> Option<bool> {
    match value.as_bool() {
        Some(b) => Some(b),
        None => {
            issues.push(path, "expected a boolean");
            None
        }
    }
}

pub(crate) fn expect_i32(value: &Value, path: &str, issues: &mut Issues) -> Option<i32> {
    match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
        Some(n) => Some(n),
        None => {
            issues.push(path, "expected a 32-bit integer");
            None
        }
    }
}

pub(crate) fn expect_i64(value: &Value, path: &str, issues: &mut Issues) -> Option<i64> {
    match value.as_i64() {
        Some(n) => Some(n),
        None => {
            issues.push(path, "expected a 64-bit integer");
            None
        }
    }
}

pub(crate) fn expect_f64(value: &Value, path: &str, issues: &mut Issues) -> Option<f64> {
    match value.as_f64() {
        Some(n) => Some(n),
        None => {
            issues.push(path, "expected a number");
            None
        }
    }
}

/// Fetch a required key from an object, recording a located issue if absent.
pub(crate) fn require_key<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &str,
    issues: &mut Issues,
) -> Option<&'a Value> {
    match map.get(key) {
        Some(value) => Some(value),
        None => {
            issues.push(&join_path(path, key), "missing required key");
            None
        }
    }
}

/// Flag any keys outside the expected set. Strict envelopes (slots, variant
/// payloads, the document root) reject what they do not understand.
pub(crate) fn reject_unknown_keys(
    map: &Map<String, Value>,
    known: &[&str],
    path: &str,
    issues: &mut Issues,
) -> bool {
    let mut clean = true;
    for key in map.keys() {
        if !known.contains(&key.as_str()) {
            issues.push(&join_path(path, key), "unrecognized key");
            clean = false;
        }
    }
    clean
}

pub(crate) fn decode_ref_id(
    value: &Value,
    path: &str,
    ctx: &mut DeserializationContext,
    issues: &mut Issues,
) -> Option<RefId> {
    let text = expect_str(value, path, issues)?;
    match Guid::parse(text) {
        Ok(guid) => Some(ctx.ref_id(guid)),
        Err(message) => {
            issues.push(path, message);
            None
        }
    }
}

pub(crate) fn encode_ref_id(id: RefId, ctx: &mut SerializationContext) -> Value {
    Value::String(ctx.reference_guid(id).to_string())
}
