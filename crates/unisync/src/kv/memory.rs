//! Non-persistent backends.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Process-local store backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// Stand-in for an environment with no usable store.
///
/// Reads find nothing and writes are silently discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl KeyValueStore for DisabledStore {
    fn get_raw(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set_raw(&self, key: &str, _value: &str) -> Result<()> {
        tracing::trace!("Dropping write to '{}': storage disabled", key);
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get_raw("a").unwrap().is_none());

        store.set_raw("a", "[]").unwrap();
        assert_eq!(store.get_raw("a").unwrap().as_deref(), Some("[]"));
        assert!(store.is_available());
    }

    #[test]
    fn test_memory_overwrite() {
        let store = MemoryStore::new();
        store.set_raw("a", "1").unwrap();
        store.set_raw("a", "2").unwrap();
        assert_eq!(store.get_raw("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.keys().unwrap().len(), 1);
    }

    #[test]
    fn test_memory_keys_sorted() {
        let store = MemoryStore::new();
        store.set_raw("tickets", "[]").unwrap();
        store.set_raw("batches", "[]").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["batches", "tickets"]);
    }

    #[test]
    fn test_disabled_store() {
        let store = DisabledStore;
        store.set_raw("a", "[]").unwrap();
        assert!(store.get_raw("a").unwrap().is_none());
        assert!(!store.remove("a").unwrap());
        assert!(!store.is_available());
    }
}
