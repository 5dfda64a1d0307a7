//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod fetch;

use std::path::{Path, PathBuf};

use salesrep_core::SalesConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("salesrep")
        .join("config.json")
}

/// Load the configuration from `path`, the default location, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<SalesConfig> {
    if let Some(path) = path {
        return Ok(SalesConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(SalesConfig::from_file(&default_path)?)
    } else {
        Ok(SalesConfig::default())
    }
}
