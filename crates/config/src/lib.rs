//! cachefetch configuration
//!
//! Resolves the cache root and download settings from an optional TOML
//! config file, falling back to platform defaults. Missing files yield
//! defaults; corrupted files are errors, never silently replaced.

mod error;
mod persistence;

pub use error::{ConfigError, ConfigResult};
pub use persistence::ConfigPersistence;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Cache location settings
    pub cache: CacheConfig,

    /// Download behavior settings
    pub download: DownloadConfig,
}

impl Config {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the config from the platform config path
    pub fn load_default() -> ConfigResult<Self> {
        let path = default_config_path()?;
        ConfigPersistence::new(path).load()
    }

    /// Validates the entire configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.download.validate()
    }
}

/// Cache location settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Explicit cache root; the platform cache directory when unset
    pub root: Option<PathBuf>,
}

impl CacheConfig {
    /// Resolves the effective cache root directory.
    pub fn resolved_root(&self) -> ConfigResult<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }

        let dirs = directories::ProjectDirs::from("", "", "cachefetch").ok_or_else(|| {
            ConfigError::PathResolutionError {
                reason: "no valid home directory".to_string(),
            }
        })?;

        Ok(dirs.cache_dir().to_path_buf())
    }
}

/// Download behavior settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DownloadConfig {
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    /// Response header / stalled read timeout in seconds
    pub read_timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
        }
    }
}

impl DownloadConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "download.connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.read_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "download.read_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform path of the config file.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "cachefetch").ok_or_else(|| {
        ConfigError::PathResolutionError {
            reason: "no valid home directory".to_string(),
        }
    })?;

    Ok(dirs.config_dir().join("config.toml"))
}
