//! Per-directory layer loading.
//!
//! Each layer directory holds at most one config file. Candidates are tried in
//! [`CONFIG_FILENAMES`] order and the first one present wins, even if later
//! candidates exist too. Load failures become an error marker instead of an
//! `Err`, so a broken file never stops resolution.

use super::types::ERROR_KEY;
use crate::error::{LayerError, LayerResult};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Candidate file names, highest priority first.
pub const CONFIG_FILENAMES: [&str; 3] = ["config.yaml", "config.yml", "config.json"];

/// Format of a config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            Some("json") => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Whether this build can parse the format.
    pub fn is_available(self) -> bool {
        match self {
            ConfigFormat::Yaml => cfg!(feature = "yaml"),
            ConfigFormat::Json => true,
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFormat::Yaml => write!(f, "yaml"),
            ConfigFormat::Json => write!(f, "json"),
        }
    }
}

/// First existing candidate file in `dir`.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.exists())
}

/// Load the layer stored in `dir`.
///
/// Returns an empty mapping when the directory or every candidate is missing.
pub fn collect_layer_config(dir: &Path) -> Map<String, Value> {
    match find_config_file(dir) {
        Some(path) => load_file(&path),
        None => {
            debug!(dir = %dir.display(), "no config file in layer directory");
            Map::new()
        }
    }
}

/// Load a single config file.
///
/// - Missing file, unknown extension or a format this build cannot parse:
///   empty mapping
/// - Read or parse failure: `{"@errors": ["Failed loading <path>: <reason>"]}`
///
/// The full path keeps messages from different layers distinct, so identical
/// failures in two directories both survive the sequence union.
pub fn load_file(path: &Path) -> Map<String, Value> {
    if !path.exists() {
        return Map::new();
    }

    let Some(format) = ConfigFormat::from_path(path) else {
        debug!(path = %path.display(), "unrecognized config file extension");
        return Map::new();
    };

    if !format.is_available() {
        debug!(path = %path.display(), %format, "format support not built in, skipping layer");
        return Map::new();
    }

    match read_layer(path, format) {
        Ok(map) => {
            debug!(path = %path.display(), keys = map.len(), "loaded config layer");
            map
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to load config layer");
            error_marker(format!("Failed loading {}: {err}", path.display()))
        }
    }
}

/// Single-entry mapping carrying a load-failure message under [`ERROR_KEY`].
pub fn error_marker(message: impl Into<String>) -> Map<String, Value> {
    let mut marker = Map::new();
    marker.insert(
        ERROR_KEY.to_string(),
        Value::Array(vec![Value::String(message.into())]),
    );
    marker
}

fn read_layer(path: &Path, format: ConfigFormat) -> LayerResult<Map<String, Value>> {
    let content = std::fs::read_to_string(path).map_err(|source| LayerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layer(&content, format)
}

/// Parse config text into a mapping.
///
/// An empty or null document is an empty mapping; any other non-mapping
/// top-level value is an error.
pub fn parse_layer(content: &str, format: ConfigFormat) -> LayerResult<Map<String, Value>> {
    let value = match format {
        ConfigFormat::Yaml => parse_yaml(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(LayerError::not_a_mapping(&other)),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str) -> LayerResult<Value> {
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str) -> LayerResult<Value> {
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let layer = collect_layer_config(&temp.path().join("absent"));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_directory_without_candidates_is_empty() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "settings.yaml", "a: 1\n");
        write(temp.path(), "config.toml", "a = 1\n");
        assert!(collect_layer_config(temp.path()).is_empty());
    }

    #[test]
    fn test_json_layer() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "config.json", r#"{"sampling": {"max_parallel": 2}}"#);
        let layer = collect_layer_config(temp.path());
        assert_eq!(Value::Object(layer), json!({"sampling": {"max_parallel": 2}}));
    }

    #[test]
    fn test_first_match_wins() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "config.yml", "from: yml\n");
        write(temp.path(), "config.json", r#"{"from": "json", "extra": true}"#);
        assert_eq!(
            find_config_file(temp.path()),
            Some(temp.path().join("config.yml"))
        );

        let layer = collect_layer_config(temp.path());
        if cfg!(feature = "yaml") {
            assert_eq!(Value::Object(layer), json!({"from": "yml"}));
        } else {
            // The yml candidate still wins selection; it just loads as empty.
            assert!(layer.is_empty());
        }
    }

    #[test]
    fn test_malformed_json_yields_error_marker() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "config.json", "{ not json");
        let layer = collect_layer_config(temp.path());
        assert_eq!(layer.len(), 1);
        let messages = layer[ERROR_KEY].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        let message = messages[0].as_str().unwrap();
        let expected = format!(
            "Failed loading {}: invalid JSON",
            temp.path().join("config.json").display()
        );
        assert!(message.starts_with(&expected));
    }

    #[test]
    fn test_top_level_sequence_is_an_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "config.json", "[1, 2, 3]");
        let layer = collect_layer_config(temp.path());
        let message = layer[ERROR_KEY][0].as_str().unwrap();
        assert!(message.ends_with("expected a mapping at the top level, found a sequence"));
    }

    #[test]
    fn test_json_null_is_empty() {
        let parsed = parse_layer("null", ConfigFormat::Json).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_unknown_extension_is_empty() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "config.ini", "[a]\nb=1\n");
        assert!(load_file(&temp.path().join("config.ini")).is_empty());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yaml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config")), None);
        assert!(ConfigFormat::Json.is_available());
    }

    #[cfg(feature = "yaml")]
    mod yaml {
        use super::*;

        #[test]
        fn test_yaml_layer_preserves_key_order() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "config.yaml",
                "version: 1\nlogging:\n  level: INFO\nsampling:\n  default_profile: deterministic_single\n",
            );
            let layer = collect_layer_config(temp.path());
            let keys: Vec<&str> = layer.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["version", "logging", "sampling"]);
            assert_eq!(layer["logging"], json!({"level": "INFO"}));
        }

        #[test]
        fn test_empty_yaml_is_empty() {
            let temp = TempDir::new().unwrap();
            write(temp.path(), "config.yaml", "# nothing configured yet\n");
            assert!(collect_layer_config(temp.path()).is_empty());
        }

        #[test]
        fn test_malformed_yaml_yields_error_marker() {
            let temp = TempDir::new().unwrap();
            write(temp.path(), "config.yaml", "logging: [unclosed\n");
            let layer = collect_layer_config(temp.path());
            let message = layer[ERROR_KEY][0].as_str().unwrap();
            assert!(message.contains("config.yaml: invalid YAML"));
        }
    }
}
