pub mod config;
pub mod spawn;
pub mod watch;

use std::path::{Path, PathBuf};

use chronorift_core::{Config, ConfigError};

/// Resolve the config file location from the global `--config` flag.
pub fn config_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => Config::path(),
    }
}

/// Load the config, writing defaults on first use.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    Config::load_from(&config_path(path)?)
}
