//! Application settings loaded from brokerdesk.toml
//!
//! Every section is optional. A missing file is not an error: the defaults write
//! exports to `./exports` and keep importing past rejected rows.

use crate::core::import::ImportPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default settings file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "brokerdesk.toml";

/// Configuration structure representing the entire brokerdesk.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub export: ExportConfig,
    pub import: ImportConfig,
}

/// Where generated files are written
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
        }
    }
}

/// How bulk imports react to rejected rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub on_error: ImportPolicy,
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid or a value has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }

    debug!(path = %path.display(), "Loading config");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads settings from the default location (./brokerdesk.toml)
pub fn load_default_config() -> Result<AppConfig> {
    load_config(DEFAULT_CONFIG_PATH)
}
