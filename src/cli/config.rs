//! `config` command: print the merged Agent OS configuration.

use crate::config::{ConfigResolver, ResolvedConfig};
use crate::format::OutputFormat;
use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Workspace directory (default: current directory)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Include the contributing layers and any load errors in the output
    #[arg(long)]
    pub show_provenance: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Output document for `--show-provenance`.
#[derive(Debug, Serialize)]
struct ConfigReport<'a> {
    provenance: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<&'a str>,
    config: Map<String, Value>,
}

/// Run the config command.
pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let workspace = match &args.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("resolving current directory")?,
    };
    if !workspace.is_dir() {
        bail!("workspace '{}' is not a directory", workspace.display());
    }

    let resolved = ConfigResolver::default().resolve(&workspace);

    if !args.show_provenance {
        for error in resolved.errors() {
            eprintln!("Warning: {}", error);
        }
    }

    println!("{}", render(&resolved, args.show_provenance, args.format)?);
    Ok(())
}

/// Render resolved configuration, with reserved keys stripped.
pub fn render(resolved: &ResolvedConfig, show_provenance: bool, format: OutputFormat) -> Result<String> {
    if show_provenance {
        let report = ConfigReport {
            provenance: resolved.provenance(),
            errors: resolved.errors(),
            config: resolved.display_config(),
        };
        format.render(&report)
    } else {
        format.render(&resolved.display_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Layer, LayerSource, error_marker};
    use serde_json::json;

    fn sample() -> ResolvedConfig {
        let mut config = error_marker("Failed loading config.yaml: invalid YAML");
        config.insert("logging".to_string(), json!({"level": "DEBUG"}));
        ResolvedConfig {
            config,
            sources: vec![
                LayerSource {
                    layer: Layer::Package,
                    dir: None,
                },
                LayerSource {
                    layer: Layer::Env,
                    dir: None,
                },
            ],
        }
    }

    #[test]
    fn test_render_strips_reserved_keys() {
        let rendered = render(&sample(), false, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value, json!({"logging": {"level": "DEBUG"}}));
    }

    #[test]
    fn test_render_with_provenance() {
        let rendered = render(&sample(), true, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value,
            json!({
                "provenance": ["package", "env"],
                "errors": ["Failed loading config.yaml: invalid YAML"],
                "config": {"logging": {"level": "DEBUG"}}
            })
        );
    }

    #[test]
    fn test_report_omits_empty_errors() {
        let resolved = ResolvedConfig::default();
        let rendered = render(&resolved, true, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value, json!({"provenance": [], "config": {}}));
    }

    #[test]
    fn test_missing_workspace_is_an_error() {
        let args = ConfigArgs {
            workspace: Some(PathBuf::from("/definitely/not/a/workspace")),
            show_provenance: false,
            format: OutputFormat::Json,
        };
        assert!(run_config(&args).is_err());
    }
}
