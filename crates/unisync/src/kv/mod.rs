//! Key-value persistence layer.
//!
//! Collections live as JSON text under fixed string keys. The backend is an
//! injected [`KeyValueStore`]; [`JsonStore`] wraps any backend with JSON
//! encoding, key namespacing and logging.

pub mod keys;
pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{Config, StorageBackend};
use crate::error::{Error, Result};

pub use memory::{DisabledStore, MemoryStore};
pub use sqlite::{SqliteStore, StoreStats};

/// A synchronous string-to-string store.
///
/// Implementations hold whole serialized collections; there is no partial
/// update at this level.
pub trait KeyValueStore: fmt::Debug + Send + Sync {
    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Replace the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn remove(&self, key: &str) -> Result<bool>;

    /// List every stored key in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn keys(&self) -> Result<Vec<String>>;

    /// Whether writes are actually retained.
    fn is_available(&self) -> bool {
        true
    }
}

/// JSON adapter over a shared [`KeyValueStore`].
///
/// Cheap to clone; all clones see the same backend.
#[derive(Debug, Clone)]
pub struct JsonStore {
    backend: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl JsonStore {
    /// Wrap a backend without a key prefix.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_prefix(backend, "")
    }

    /// Wrap a backend, storing every key as `prefix:key`.
    #[must_use]
    pub fn with_prefix(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// A fresh in-memory store, mostly useful in tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Build the store described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the `SQLite` database cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Sqlite => Arc::new(SqliteStore::open(config.database_path())?),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Disabled => Arc::new(DisabledStore),
        };
        Ok(Self::with_prefix(backend, config.storage.key_prefix.clone()))
    }

    /// The configured key prefix (possibly empty).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the underlying backend retains writes.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    fn full_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{key}", self.prefix)
        }
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptValue`] if the stored text is not valid JSON
    /// for `T`, or a storage error if the backend fails.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let full_key = self.full_key(key);
        let Some(raw) = self.backend.get_raw(&full_key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                warn!("Stored value under '{}' is not valid: {}", full_key, source);
                Err(Error::corrupt_value(full_key, source))
            }
        }
    }

    /// Encode and store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let full_key = self.full_key(key);
        let raw = serde_json::to_string(value)?;
        debug!("Writing {} bytes under '{}'", raw.len(), full_key);
        self.backend.set_raw(&full_key, &raw)
    }

    /// Whether anything is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.backend.get_raw(&self.full_key(key))?.is_some())
    }

    /// Remove `key`, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn remove(&self, key: &str) -> Result<bool> {
        self.backend.remove(&self.full_key(key))
    }

    /// Keys visible through this adapter, with the prefix stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let keys = self.backend.keys()?;
        if self.prefix.is_empty() {
            return Ok(keys);
        }
        let namespace = format!("{}:", self.prefix);
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&namespace).map(str::to_string))
            .collect())
    }
}
