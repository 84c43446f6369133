//! Output formatting for resolved configuration.

use anyhow::Result;
use serde::Serialize;

/// Output format for rendered configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    #[value(alias = "yml")]
    Yaml,
}

impl OutputFormat {
    /// Render `value` in this format.
    ///
    /// JSON is pretty-printed with two-space indentation. Without YAML support
    /// in the build, YAML requests fall back to JSON.
    pub fn render<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => render_yaml(value),
        }
    }
}

#[cfg(feature = "yaml")]
fn render_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

#[cfg(not(feature = "yaml"))]
fn render_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    tracing::warn!("yaml output not built in, rendering json");
    Ok(serde_json::to_string_pretty(value)?)
}
