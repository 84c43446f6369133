//! Platform lookup for the user-global Agent OS configuration directory.
//!
//! - macOS: `~/Library/Application Support/EvoSuite/agent-os`
//! - Linux / Unix: `~/.config/evosuite/agent-os`
//! - Windows: `%APPDATA%\EvoSuite\agent-os`
//!
//! The returned directory may not exist; the layer loader treats a missing
//! directory as an empty layer.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Platform families with a distinct user config root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and every other Unix-like host.
    Unix,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

/// Resolve the user-global config directory for the running host.
pub fn user_config_root() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| {
        debug!("home directory unavailable, user config root is relative");
        PathBuf::new()
    });
    let appdata = std::env::var_os("APPDATA").map(PathBuf::from);
    user_config_root_for(Platform::current(), &home, appdata.as_deref())
}

/// Resolve the user-global config directory for an explicit platform.
///
/// `appdata` is only consulted on Windows; when it is `None` the roaming
/// profile under `home` is used instead.
pub fn user_config_root_for(platform: Platform, home: &Path, appdata: Option<&Path>) -> PathBuf {
    match platform {
        Platform::Windows => appdata
            .map(Path::to_path_buf)
            .unwrap_or_else(|| home.join("AppData").join("Roaming"))
            .join("EvoSuite")
            .join("agent-os"),
        Platform::MacOs => home
            .join("Library")
            .join("Application Support")
            .join("EvoSuite")
            .join("agent-os"),
        Platform::Unix => home.join(".config").join("evosuite").join("agent-os"),
    }
}
