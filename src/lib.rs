//! EvoSuite core runtime.
//!
//! The main entry point is [`config::load_agent_os_config`], which resolves the
//! layered Agent OS configuration for a workspace.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod paths;

pub use config::load_agent_os_config;
