//! EvoSuite command-line interface.

use anyhow::Result;
use clap::Parser;
use evosuite::cli::config::run_config;
use evosuite::cli::{Cli, Command};
use evosuite::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;
    debug!(command = ?cli.command, "starting");

    match cli.command {
        Command::Config(args) => run_config(&args)?,
    }

    Ok(())
}
