//! Configuration loading.
//!
//! A single optional YAML file under the platform config directory; every
//! field has a default, so no file at all is the common case. A missing
//! default file yields the defaults, an explicitly named file that cannot
//! be read or parsed is an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name under the platform config and data roots.
pub const APP_DIR: &str = "tableau";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the task database.
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Config {
    /// Load configuration. An explicit path must exist; the default
    /// location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where the database lives when nothing overrides it.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("tasks.db")
}

/// Default config file location, when the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
}

/// Resolve the database path: CLI flag, then `TABLEAU_DB`, then config.
pub fn resolve_db_path(cli_override: Option<PathBuf>, config: &Config) -> PathBuf {
    if let Some(path) = cli_override {
        return path;
    }
    if let Some(path) = std::env::var_os("TABLEAU_DB") {
        return PathBuf::from(path);
    }
    config.db_path.clone()
}
