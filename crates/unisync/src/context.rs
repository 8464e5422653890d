//! Wiring of the store, the connector service and the portal stores.

use std::sync::Arc;

use tracing::debug;

use crate::config::{Config, StorageBackend};
use crate::connector::ConnectorService;
use crate::error::Result;
use crate::kv::{keys, JsonStore, SqliteStore, StoreStats};
use crate::portal::{AdminStore, FacultyStore, StudentStore};
use crate::sync::{self, AutoSyncReport, SyncOptions};

/// Everything a front end needs, built once from the configuration.
///
/// All parts share one backend, so a write through any of them is visible
/// to the others.
#[derive(Debug, Clone)]
pub struct AppContext {
    store: JsonStore,
    sqlite: Option<Arc<SqliteStore>>,
    connector: ConnectorService,
    student: StudentStore,
    faculty: FacultyStore,
    admin: AdminStore,
    sync_options: SyncOptions,
}

impl AppContext {
    /// Open the configured store and build the services over it.
    ///
    /// Missing shared collections are initialized when
    /// `connector.initialize_on_open` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialization
    /// fails.
    pub fn open(config: &Config) -> Result<Self> {
        let (store, sqlite) = match config.storage.backend {
            StorageBackend::Sqlite => {
                let db = Arc::new(SqliteStore::open(config.database_path())?);
                let store = JsonStore::with_prefix(db.clone(), config.storage.key_prefix.clone());
                (store, Some(db))
            }
            StorageBackend::Memory | StorageBackend::Disabled => {
                (JsonStore::from_config(config)?, None)
            }
        };
        debug!("Opened {} store", config.storage.backend);

        let mut context = Self::from_store(store);
        context.sqlite = sqlite;
        context.sync_options = SyncOptions::from(&config.sync);

        if config.connector.initialize_on_open {
            context.connector.initialize_if_empty()?;
        }
        Ok(context)
    }

    /// Build the services over an existing store with default options.
    #[must_use]
    pub fn from_store(store: JsonStore) -> Self {
        Self {
            connector: ConnectorService::new(store.clone()),
            student: StudentStore::new(store.clone()),
            faculty: FacultyStore::new(store.clone()),
            admin: AdminStore::new(store.clone()),
            sqlite: None,
            sync_options: SyncOptions::default(),
            store,
        }
    }

    /// The shared JSON store.
    #[must_use]
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// The connector service.
    #[must_use]
    pub fn connector(&self) -> &ConnectorService {
        &self.connector
    }

    /// Student portal storage.
    #[must_use]
    pub fn student(&self) -> &StudentStore {
        &self.student
    }

    /// Faculty portal storage.
    #[must_use]
    pub fn faculty(&self) -> &FacultyStore {
        &self.faculty
    }

    /// Admin portal storage.
    #[must_use]
    pub fn admin(&self) -> &AdminStore {
        &self.admin
    }

    /// Options used by [`auto_sync`](Self::auto_sync).
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        self.sync_options
    }

    /// Database statistics, when the backend is `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics query fails.
    pub fn stats(&self) -> Result<Option<StoreStats>> {
        self.sqlite.as_ref().map(|db| db.stats()).transpose()
    }

    /// Record counts for every per-portal collection, in storage-key order.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails or a stored value is corrupt.
    pub fn portal_counts(&self) -> Result<Vec<(&'static str, usize)>> {
        keys::PORTAL_COLLECTIONS
            .iter()
            .map(|key| {
                let records: Option<Vec<serde_json::Value>> = self.store.get(key)?;
                Ok((*key, records.map_or(0, |r| r.len())))
            })
            .collect()
    }

    /// Run both sync connectors with the configured options.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn auto_sync(&self) -> Result<AutoSyncReport> {
        sync::auto_sync(&self.faculty, &self.student, self.sync_options)
    }
}
