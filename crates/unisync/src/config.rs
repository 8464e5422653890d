//! Configuration management for unisync.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::fmt;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "unisync";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "portal.db";

/// Characters allowed in a storage key prefix.
const KEY_PREFIX_PATTERN: &str = r"^[A-Za-z0-9_.-]*$";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `UNISYNC_`, with `__` between
///    section and field, e.g. `UNISYNC_STORAGE__KEY_PREFIX`)
/// 2. TOML config file at `~/.config/unisync/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Cross-portal sync configuration.
    pub sync: SyncConfig,
    /// Connector service configuration.
    pub connector: ConnectorConfig,
}

/// Which key-value backend holds the collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Persistent `SQLite` file.
    #[default]
    Sqlite,
    /// Process-local map, lost on exit.
    Memory,
    /// No store at all: reads are empty and writes are dropped.
    Disabled,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend used for all collections.
    pub backend: StorageBackend,
    /// Path to the database file.
    /// Defaults to `~/.local/share/unisync/portal.db`
    pub database_path: Option<PathBuf>,
    /// Namespace prepended to every storage key as `prefix:key`.
    /// Empty means keys are stored as-is.
    pub key_prefix: String,
}

/// Sync-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Emit one notification per synced record.
    pub notify: bool,
    /// Run the assignment and submission connectors before reporting status.
    pub auto_sync: bool,
}

/// Connector-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Write empty collections for missing keys when the context opens.
    pub initialize_on_open: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            notify: true,
            auto_sync: true,
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            initialize_on_open: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
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

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("UNISYNC_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
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
        let pattern = regex::Regex::new(KEY_PREFIX_PATTERN)
            .map_err(|e| Error::internal(format!("bad key prefix pattern: {e}")))?;
        if !pattern.is_match(&self.storage.key_prefix) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "key_prefix '{}' may only contain letters, digits, '_', '.' and '-'",
                    self.storage.key_prefix
                ),
            });
        }

        if self.storage.backend != StorageBackend::Sqlite && self.storage.database_path.is_some()
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "database_path is only used by the sqlite backend (backend is {})",
                    self.storage.backend
                ),
            });
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(config.storage.key_prefix.is_empty());
        assert!(config.sync.notify);
        assert!(config.sync.auto_sync);
        assert!(config.connector.initialize_on_open);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_prefix_with_dots_and_dashes() {
        let mut config = Config::default();
        config.storage.key_prefix = "campus-1.portal_v2".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_prefix() {
        let mut config = Config::default();
        config.storage.key_prefix = "bad prefix:".to_string();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("key_prefix"));
    }

    #[test]
    fn test_validate_database_path_needs_sqlite() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        config.storage.database_path = Some(PathBuf::from("/tmp/x.db"));

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("database_path"));
        assert!(err.contains("memory"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("portal.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(StorageBackend::Sqlite.to_string(), "sqlite");
        assert_eq!(StorageBackend::Memory.to_string(), "memory");
        assert_eq!(StorageBackend::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("unisync"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_| {
            let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
            assert!(result.is_ok());
            assert_eq!(result.unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_underscored_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("UNISYNC_STORAGE__BACKEND", "memory");
            jail.set_env("UNISYNC_STORAGE__KEY_PREFIX", "campus");
            jail.set_env("UNISYNC_SYNC__AUTO_SYNC", "false");
            jail.set_env("UNISYNC_CONNECTOR__INITIALIZE_ON_OPEN", "false");

            let config = Config::load_from(Some(jail.directory().join("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(config.storage.key_prefix, "campus");
            assert!(!config.sync.auto_sync);
            assert!(config.sync.notify);
            assert!(!config.connector.initialize_on_open);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [storage]
                key_prefix = "file"

                [sync]
                notify = false
                "#,
            )?;
            jail.set_env("UNISYNC_STORAGE__DATABASE_PATH", "/tmp/env-portal.db");
            jail.set_env("UNISYNC_STORAGE__KEY_PREFIX", "env");

            let config = Config::load_from(Some(jail.directory().join("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.key_prefix, "env");
            assert_eq!(
                config.storage.database_path,
                Some(PathBuf::from("/tmp/env-portal.db"))
            );
            assert!(!config.sync.notify);
            Ok(())
        });
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"backend": "memory", "key_prefix": "demo"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.backend, StorageBackend::Memory);
        assert_eq!(storage.key_prefix, "demo");
        assert!(storage.database_path.is_none());
    }

    #[test]
    fn test_sync_config_serialize() {
        let json = serde_json::to_string(&SyncConfig::default()).unwrap();
        assert!(json.contains("auto_sync"));
        assert!(json.contains("notify"));
    }
}
