//! Layer orchestration.
//!
//! Applies the four layers to one accumulator in fixed order (package, user,
//! workspace, env). Only layers that loaded non-empty data are merged and
//! recorded in provenance.

use super::env::{env_overrides, parse_env_overrides};
use super::loader::{ConfigFormat, collect_layer_config, error_marker, parse_layer};
use super::merge::deep_merge;
use super::types::{Layer, LayerSource, ResolvedConfig};
use crate::paths::user_config_root;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Workspace-local layer directory, relative to the workspace root.
pub const WORKSPACE_DIR_NAME: &str = ".agent-os";

/// Defaults shipped inside the binary. The stock file holds only comments, so
/// the package layer contributes nothing unless a distribution fills it in.
const PACKAGED_DEFAULTS: &str = include_str!("../../defaults/config.yaml");

/// Where the package layer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// `defaults/config.yaml`, embedded at build time
    Embedded,
    /// A directory read with the usual candidate-file rules
    Dir(PathBuf),
}

/// Inputs for each layer.
#[derive(Debug, Clone)]
pub struct LayerSources {
    pub package: PackageSource,
    /// User-global directory
    pub user_dir: PathBuf,
    /// Environment snapshot; `None` reads the process environment at resolve time
    pub env: Option<Vec<(String, String)>>,
}

impl Default for LayerSources {
    fn default() -> Self {
        Self::discover()
    }
}

impl LayerSources {
    /// Embedded defaults, the platform user directory and the process environment.
    pub fn discover() -> Self {
        Self {
            package: PackageSource::Embedded,
            user_dir: user_config_root(),
            env: None,
        }
    }

    /// Explicit package and user directories.
    ///
    /// A `None` package directory keeps the embedded defaults.
    pub fn with_dirs(package_dir: Option<PathBuf>, user_dir: PathBuf) -> Self {
        Self {
            package: package_dir.map_or(PackageSource::Embedded, PackageSource::Dir),
            user_dir,
            env: None,
        }
    }

    /// Use a fixed environment table instead of the process environment.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        );
        self
    }
}

/// Resolves merged Agent OS configuration for workspaces.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    sources: LayerSources,
}

impl ConfigResolver {
    pub fn new(sources: LayerSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &LayerSources {
        &self.sources
    }

    /// Resolve configuration for the workspace rooted at `workspace_root`.
    ///
    /// Never fails: missing sources contribute nothing and broken files
    /// contribute an `@errors` entry.
    pub fn resolve(&self, workspace_root: &Path) -> ResolvedConfig {
        let mut resolved = ResolvedConfig::default();

        for layer in Layer::ALL {
            let (data, dir) = self.load_layer(layer, workspace_root);
            resolved.merge_layer(LayerSource { layer, dir }, data);
        }

        debug!(provenance = ?resolved.provenance(), "resolved agent os config");
        resolved
    }

    fn load_layer(&self, layer: Layer, workspace_root: &Path) -> (Map<String, Value>, Option<PathBuf>) {
        match layer {
            Layer::Package => match &self.sources.package {
                PackageSource::Embedded => (embedded_defaults(), None),
                PackageSource::Dir(dir) => (collect_layer_config(dir), Some(dir.clone())),
            },
            Layer::User => {
                let dir = self.sources.user_dir.clone();
                (collect_layer_config(&dir), Some(dir))
            }
            Layer::Workspace => {
                let dir = workspace_root.join(WORKSPACE_DIR_NAME);
                (collect_layer_config(&dir), Some(dir))
            }
            Layer::Env => {
                let overrides = match &self.sources.env {
                    Some(vars) => parse_env_overrides(vars.iter().map(|(name, value)| (name, value))),
                    None => env_overrides(),
                };
                (overrides, None)
            }
        }
    }
}

impl ResolvedConfig {
    /// Merge one layer into the accumulator, recording it if it had data.
    pub(crate) fn merge_layer(&mut self, source: LayerSource, data: Map<String, Value>) {
        if data.is_empty() {
            debug!(layer = %source.layer, "layer empty, skipped");
            return;
        }
        debug!(layer = %source.layer, keys = data.len(), "merging layer");
        deep_merge(&mut self.config, data);
        self.sources.push(source);
    }
}

/// Parse the embedded defaults as a YAML layer.
///
/// Without YAML support the package layer is empty.
fn embedded_defaults() -> Map<String, Value> {
    if !ConfigFormat::Yaml.is_available() {
        debug!("yaml support not built in, embedded defaults skipped");
        return Map::new();
    }
    match parse_layer(PACKAGED_DEFAULTS, ConfigFormat::Yaml) {
        Ok(map) => map,
        Err(err) => {
            warn!(error = %err, "embedded defaults failed to parse");
            error_marker(format!("Failed loading embedded defaults: {err}"))
        }
    }
}

/// Load layered Agent OS configuration for `workspace_root`.
///
/// Precedence, lowest to highest:
/// 1. Packaged defaults
/// 2. User-global directory (see [`crate::paths::user_config_root`])
/// 3. `<workspace_root>/.agent-os/`
/// 4. `EVOSUITE_AGENT_OS_*` environment variables
///
/// The result carries the contributing layers under `@provenance` (absent when
/// nothing contributed) and any load failures under `@errors`. Keys starting
/// with `@` are reserved for this metadata.
pub fn load_agent_os_config(workspace_root: impl AsRef<Path>) -> Map<String, Value> {
    load_agent_os_config_with(workspace_root, LayerSources::discover())
}

/// [`load_agent_os_config`] with explicit layer sources.
pub fn load_agent_os_config_with(
    workspace_root: impl AsRef<Path>,
    sources: LayerSources,
) -> Map<String, Value> {
    ConfigResolver::new(sources)
        .resolve(workspace_root.as_ref())
        .into_map()
}
