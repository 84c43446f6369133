//! Deep merge for configuration layers.
//!
//! Merges an incoming layer into an accumulator in place:
//! - Mappings are merged recursively, key by key
//! - Sequences are unioned: incoming items are appended unless an equal item
//!   (by canonical encoding) is already present
//! - Anything else (scalars, nulls, mismatched types) is replaced by the
//!   incoming value
//!
//! The merge is order-sensitive: later layers win.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Deep merge `incoming` into `base`, with `incoming` taking precedence.
///
/// Values of `incoming` are moved into `base`; nothing is cloned. New keys are
/// appended after existing ones, so `base` keeps its key order.
///
/// # Example
/// ```
/// use serde_json::json;
/// use evosuite::config::deep_merge;
///
/// let mut base = json!({
///     "logging": { "level": "INFO", "file": "run.log" },
///     "tags": ["a", "b"]
/// });
/// let incoming = json!({
///     "logging": { "level": "DEBUG" },
///     "tags": ["b", "c"]
/// });
/// deep_merge(base.as_object_mut().unwrap(), incoming.as_object().unwrap().clone());
/// assert_eq!(base, json!({
///     "logging": { "level": "DEBUG", "file": "run.log" },
///     "tags": ["a", "b", "c"]
/// }));
/// ```
pub fn deep_merge(base: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, incoming_value) in incoming {
        match base.get_mut(&key) {
            Some(existing) => merge_value(existing, incoming_value),
            None => {
                base.insert(key, incoming_value);
            }
        }
    }
}

fn merge_value(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            deep_merge(base_map, incoming_map);
        }
        (Value::Array(base_items), Value::Array(incoming_items)) => {
            append_unique(base_items, incoming_items);
        }
        (existing, incoming) => *existing = incoming,
    }
}

/// Append the items of `incoming` that are not already in `base`.
///
/// Existing items keep their position; appended items keep `incoming` order.
/// Repeats inside `incoming` are appended once.
fn append_unique(base: &mut Vec<Value>, incoming: Vec<Value>) {
    let mut seen: HashSet<String> = base.iter().map(canonical_encoding).collect();
    for item in incoming {
        if seen.insert(canonical_encoding(&item)) {
            base.push(item);
        }
    }
}

/// Order-independent encoding of a value, used to compare sequence items.
///
/// Object keys are sorted recursively and the result is written as compact
/// JSON, so `{"a":1,"b":2}` and `{"b":2,"a":1}` encode alike. Numbers are
/// written exactly as stored: `1` and `1.0` differ, and integers beyond 2^53
/// stay distinct.
pub fn canonical_encoding(value: &Value) -> String {
    sorted_keys(value).to_string()
}

fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, item)| (key.clone(), sorted_keys(item)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        scalar => scalar.clone(),
    }
}
