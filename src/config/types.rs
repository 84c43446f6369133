//! Layer identities, reserved keys and the resolved configuration.

use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::warn;

/// Reserved key holding the provenance list in the merged mapping.
pub const PROVENANCE_KEY: &str = "@provenance";

/// Reserved key holding load-failure messages.
///
/// A layer whose file cannot be parsed contributes `{"@errors": [message]}`.
/// Because sequences are unioned during merge, failures from several layers
/// accumulate instead of overwriting each other.
pub const ERROR_KEY: &str = "@errors";

/// Prefix shared by every reserved key.
///
/// Environment variable names cannot produce it, and configuration files
/// must not use it for their own keys.
pub const RESERVED_PREFIX: char = '@';

/// Whether `key` is engine metadata rather than configuration.
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

/// Configuration layers in precedence order (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Defaults shipped with the engine
    Package = 0,
    /// User-global directory for the platform
    User = 1,
    /// `<workspace>/.agent-os/`
    Workspace = 2,
    /// `EVOSUITE_AGENT_OS_*` environment variables
    Env = 3,
}

impl Layer {
    /// All layers, in the order they are applied.
    pub const ALL: [Layer; 4] = [Layer::Package, Layer::User, Layer::Workspace, Layer::Env];
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Package => write!(f, "package"),
            Layer::User => write!(f, "user"),
            Layer::Workspace => write!(f, "workspace"),
            Layer::Env => write!(f, "env"),
        }
    }
}

/// One contributing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSource {
    pub layer: Layer,
    /// Directory the layer was read from (user and workspace layers only)
    pub dir: Option<PathBuf>,
}

impl LayerSource {
    /// Provenance label: the directory for file layers, the layer name otherwise.
    pub fn label(&self) -> String {
        match (&self.layer, &self.dir) {
            (Layer::User | Layer::Workspace, Some(dir)) => dir.to_string_lossy().into_owned(),
            (layer, _) => layer.to_string(),
        }
    }
}

/// Result of one resolution: merged mapping plus the layers that fed it.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// Merged configuration, without the provenance key
    pub config: Map<String, Value>,
    /// Contributing layers in application order
    pub sources: Vec<LayerSource>,
}

impl ResolvedConfig {
    /// Provenance labels in application order.
    pub fn provenance(&self) -> Vec<String> {
        self.sources.iter().map(LayerSource::label).collect()
    }

    /// Whether `layer` contributed non-empty data.
    pub fn contributed(&self, layer: Layer) -> bool {
        self.sources.iter().any(|source| source.layer == layer)
    }

    /// Load-failure messages collected under [`ERROR_KEY`].
    pub fn errors(&self) -> Vec<&str> {
        match self.config.get(ERROR_KEY) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(message)) => vec![message.as_str()],
            _ => Vec::new(),
        }
    }

    /// The merged mapping with every reserved key removed.
    pub fn display_config(&self) -> Map<String, Value> {
        self.config
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// The merged mapping with provenance attached under [`PROVENANCE_KEY`].
    ///
    /// The key is left out when no layer contributed.
    pub fn into_map(self) -> Map<String, Value> {
        let provenance = self.provenance();
        let mut config = self.config;
        if !provenance.is_empty() {
            if config.contains_key(PROVENANCE_KEY) {
                warn!(key = PROVENANCE_KEY, "reserved key set by a config layer, replacing it");
            }
            let labels = provenance.into_iter().map(Value::String).collect();
            config.insert(PROVENANCE_KEY.to_string(), Value::Array(labels));
        }
        config
    }
}
