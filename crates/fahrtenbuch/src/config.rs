//! Configuration management for fahrtenbuch.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::DEFAULT_COLLECTION_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "fahrtenbuch";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "fahrtenbuch.db";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "FAHRTENBUCH_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FAHRTENBUCH_`, sections separated by `__`)
/// 2. TOML config file at `~/.config/fahrtenbuch/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Photo sidecar configuration.
    pub photos: PhotosConfig,
    /// Export configuration.
    pub export: ExportConfig,
    /// Import configuration.
    pub import: ImportConfig,
    /// Entry store configuration.
    pub store: StoreConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/fahrtenbuch/fahrtenbuch.db`
    pub database_path: Option<PathBuf>,
    /// Key under which the entry collection is stored.
    pub collection_key: String,
}

/// Photo sidecar configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotosConfig {
    /// Directory holding entry photos.
    /// Defaults to `~/.local/share/fahrtenbuch/photos`
    pub directory: Option<PathBuf>,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to.
    /// Defaults to `~/.local/share/fahrtenbuch/backups`
    pub backup_directory: Option<PathBuf>,
    /// Whether exported files can be shared at all.
    pub share_enabled: bool,
    /// Command run with the exported file path, e.g. `xdg-open`.
    pub share_command: Option<String>,
}

/// What to do with a CSV row that cannot be turned into an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Log the row and carry on.
    #[default]
    Skip,
    /// Fail the whole import.
    Reject,
}

/// Import-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Handling of malformed rows.
    pub malformed_rows: MalformedRowPolicy,
}

/// Entry store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of requests that may wait for the writer task.
    pub queue_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            backup_directory: None,
            share_enabled: true,
            share_command: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { queue_capacity: 32 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FAHRTENBUCH_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &std::path::Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.collection_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "collection_key must not be empty".to_string(),
            });
        }

        if self.store.queue_capacity == 0 {
            return Err(Error::ConfigValidation {
                message: "queue_capacity must be greater than 0".to_string(),
            });
        }

        if let Some(command) = &self.export.share_command {
            if command.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "share_command must not be empty when set".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the photo directory, resolving defaults if not set.
    #[must_use]
    pub fn photos_directory(&self) -> PathBuf {
        self.photos
            .directory
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("photos"))
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn backup_directory(&self) -> PathBuf {
        self.export
            .backup_directory
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("backups"))
    }
}
