//! Environment variable overrides.
//!
//! `EVOSUITE_AGENT_OS_<PATH>` sets a nested key: the part after the prefix is
//! lower-cased and split on `__`, so `EVOSUITE_AGENT_OS_SAMPLING__MAX_PARALLEL=4`
//! becomes `{"sampling": {"max_parallel": 4}}`.
//!
//! Values are coerced in a fixed order:
//! 1. all ASCII digits: unsigned integer
//! 2. `true` / `false` in any case: boolean
//! 3. valid JSON: the parsed value (`[1,2]`, `{"a":1}`, `"quoted"`, `1.5`)
//! 4. anything else: the raw string

use serde_json::{Map, Number, Value};
use std::ffi::OsString;
use tracing::debug;

/// Prefix selecting the variables that override configuration.
pub const ENV_PREFIX: &str = "EVOSUITE_AGENT_OS_";

/// Separator between nested key segments.
pub const ENV_SEPARATOR: &str = "__";

/// Build overrides from the process environment.
///
/// The snapshot is sorted by variable name before parsing, so when two
/// variables collide the lexicographically later one wins on every platform.
pub fn env_overrides() -> Map<String, Value> {
    parse_env_overrides(sorted_by_name(std::env::vars_os()))
}

/// UTF-8 entries of an environment table, sorted by name.
///
/// Entries whose name or value is not valid UTF-8 are dropped.
fn sorted_by_name<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut vars: Vec<(String, String)> = vars
        .into_iter()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .collect();
    vars.sort();
    vars
}

/// Build overrides from an explicit `(name, value)` table.
///
/// Variables are applied in iteration order; on collision the last one
/// processed wins. A leaf replaces whatever was at its position, and an
/// intermediate segment that lands on a non-mapping replaces it with a mapping.
pub fn parse_env_overrides<I, K, V>(vars: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut overrides = Map::new();

    for (name, raw) in vars {
        let Some(path) = name.as_ref().strip_prefix(ENV_PREFIX) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }

        let path = path.to_lowercase();
        let segments: Vec<&str> = path.split(ENV_SEPARATOR).collect();
        debug!(variable = name.as_ref(), "applying env override");
        insert_path(&mut overrides, &segments, coerce_value(raw.as_ref()));
    }

    overrides
}

/// Set `value` at the nested key `segments` under `target`.
///
/// Intermediate mappings are created as needed; an intermediate segment that
/// holds a non-mapping is replaced by an empty mapping.
fn insert_path(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            target.insert(leaf.to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                debug!(segment = *head, "env override replaces a scalar with a mapping");
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert_path(child, rest, value);
            }
        }
    }
}

/// Coerce a raw environment value into a structured value.
pub fn coerce_value(raw: &str) -> Value {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        // Too large for u64: keep the digits verbatim rather than reading them as JSON.
        return match raw.parse::<u64>() {
            Ok(n) => Value::Number(Number::from(n)),
            Err(_) => Value::String(raw.to_string()),
        };
    }

    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
