//! `unisync` - Shared data layer for a university portal
//!
//! This library provides the key-value persistence adapter, the per-portal
//! storage modules, the connector service with change notification, and the
//! cross-portal sync routines that keep the student and faculty views aligned.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod connector;
pub mod context;
pub mod error;
pub mod kv;
pub mod logging;
pub mod model;
pub mod portal;
pub mod sync;

pub use config::Config;
pub use connector::{ChangeEvent, ConnectorService, DataType, Subscription};
pub use context::AppContext;
pub use error::{Error, Result};
pub use kv::{DisabledStore, JsonStore, KeyValueStore, MemoryStore, SqliteStore};
pub use logging::init_logging;
pub use portal::{AdminStore, Collection, FacultyStore, StudentStore};
pub use sync::{
    auto_sync, sync_assignments, sync_submissions, AutoSyncReport, SyncOptions, SyncReport,
};
