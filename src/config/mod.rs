//! Layered Agent OS configuration.
//!
//! Merges four layers, lowest to highest precedence:
//! 1. **Package** - defaults shipped with the engine (`defaults/config.yaml`)
//! 2. **User** - platform user directory, e.g. `~/.config/evosuite/agent-os/`
//! 3. **Workspace** - `<workspace>/.agent-os/`
//! 4. **Env** - `EVOSUITE_AGENT_OS_*` variables, `__` separating nested keys
//!
//! ## Files
//! Each directory layer reads the first of `config.yaml`, `config.yml`,
//! `config.json` that exists.
//!
//! ## Merge Strategy
//! - Mappings: deep merge key by key
//! - Sequences: union, appending items not already present
//! - Scalars and mismatched types: last layer wins
//!
//! ## Reserved Keys
//! Keys starting with `@` are engine metadata: `@provenance` lists the layers
//! that contributed and `@errors` collects load failures.

mod env;
mod loader;
mod merge;
mod resolver;
mod types;

pub use env::{ENV_PREFIX, ENV_SEPARATOR, coerce_value, env_overrides, parse_env_overrides};
pub use loader::{
    CONFIG_FILENAMES, ConfigFormat, collect_layer_config, error_marker, find_config_file,
    load_file, parse_layer,
};
pub use merge::{canonical_encoding, deep_merge};
pub use resolver::{
    ConfigResolver, LayerSources, PackageSource, WORKSPACE_DIR_NAME, load_agent_os_config,
    load_agent_os_config_with,
};
pub use types::*;
