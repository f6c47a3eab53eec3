pub mod classify;
pub mod config;
pub mod note;
pub mod shell;
pub mod suggest;

use std::path::Path;

use focusflow_core::Config;

/// An explicit `--config` path must load; otherwise the default file is
/// used when present.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::load_or_default()),
    }
}
