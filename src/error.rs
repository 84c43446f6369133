//! Error types for configuration layer loading.
//!
//! Layer errors never leave the resolver: they are rendered into the
//! `@errors` marker of the layer that failed so resolution always completes.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single configuration file could not be turned into a mapping.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "yaml")]
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },
}

impl LayerError {
    /// Build a `NotAMapping` error describing the offending value.
    pub fn not_a_mapping(value: &serde_json::Value) -> Self {
        Self::NotAMapping {
            found: value_kind(value),
        }
    }
}

/// Human-readable name of a value's variant.
pub fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Result type for layer loading.
pub type LayerResult<T> = Result<T, LayerError>;
