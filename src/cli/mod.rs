//! CLI command definitions for evosuite
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod config;

use clap::{Parser, Subcommand};
use config::ConfigArgs;

/// EvoSuite: evolutionary optimization framework
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the merged Agent OS configuration
    Config(ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_config_command() {
        let cli = Cli::try_parse_from([
            "evosuite",
            "--verbose",
            "config",
            "--workspace",
            "/tmp/project",
            "--show-provenance",
            "--format",
            "yaml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log, "2");
        let Command::Config(args) = cli.command;
        assert_eq!(args.workspace, Some(PathBuf::from("/tmp/project")));
        assert!(args.show_provenance);
        assert_eq!(args.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_config_defaults() {
        let cli = Cli::try_parse_from(["evosuite", "config"]).unwrap();
        let Command::Config(args) = cli.command;
        assert_eq!(args.workspace, None);
        assert!(!args.show_provenance);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
