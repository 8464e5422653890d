//! Whole-collection CRUD over a single storage key.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::Result;
use crate::kv::JsonStore;
use crate::model::Record;

/// Typed access to the JSON array stored under one key.
///
/// Every mutation reads the full array, transforms it and writes it back.
/// Operations on an id that is not present change nothing and perform no
/// write.
pub struct Collection<T> {
    store: JsonStore,
    key: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("key", &self.key).finish()
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _record: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    /// Bind a collection to `key` in `store`.
    #[must_use]
    pub fn new(store: JsonStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            _record: PhantomData,
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Whether a value (even an empty array) is stored under the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn is_initialized(&self) -> Result<bool> {
        self.store.contains(self.key)
    }

    /// All records, or an empty vec when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored value is corrupt.
    pub fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.store.get(self.key)?.unwrap_or_default())
    }

    /// Replace the stored array.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_all(&self, records: &[T]) -> Result<()> {
        self.store.set(self.key, records)
    }

    /// First record with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        Ok(self.get_all()?.into_iter().find(|r| r.id() == id))
    }

    /// Whether any record has the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.get_all()?.iter().any(|r| r.id() == id))
    }

    /// Append a record without checking for an existing id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn add(&self, record: T) -> Result<Vec<T>> {
        let mut records = self.get_all()?;
        records.push(record);
        self.save_all(&records)?;
        debug!("Appended to '{}', now {} records", self.key, records.len());
        Ok(records)
    }

    /// Append a record unless one with the same id exists.
    ///
    /// A refused duplicate returns the stored collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn add_unique(&self, record: T) -> Result<Vec<T>> {
        let mut records = self.get_all()?;
        if records.iter().any(|r| r.id() == record.id()) {
            debug!("'{}' already holds id {}, not adding", self.key, record.id());
            return Ok(records);
        }
        records.push(record);
        self.save_all(&records)?;
        Ok(records)
    }

    /// Append several records in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn extend(&self, new_records: impl IntoIterator<Item = T>) -> Result<Vec<T>> {
        let mut records = self.get_all()?;
        let before = records.len();
        records.extend(new_records);
        if records.len() != before {
            self.save_all(&records)?;
        }
        Ok(records)
    }

    /// Replace every record whose id matches `record`'s.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn update(&self, record: T) -> Result<Vec<T>> {
        self.try_update(record).map(|(records, _)| records)
    }

    /// Like [`update`](Self::update), also reporting whether anything matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn try_update(&self, record: T) -> Result<(Vec<T>, bool)> {
        let mut records = self.get_all()?;
        let mut matched = false;
        for existing in records.iter_mut().filter(|r| r.id() == record.id()) {
            *existing = record.clone();
            matched = true;
        }
        if matched {
            self.save_all(&records)?;
        } else {
            debug!("No record {} in '{}', update skipped", record.id(), self.key);
        }
        Ok((records, matched))
    }

    /// Apply `change` to the first record with the given id and store the
    /// result, returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn update_with(&self, id: &str, change: impl FnOnce(&mut T)) -> Result<Option<T>> {
        let mut records = self.get_all()?;
        let Some(existing) = records.iter_mut().find(|r| r.id() == id) else {
            debug!("No record {} in '{}', update skipped", id, self.key);
            return Ok(None);
        };
        change(existing);
        let updated = existing.clone();
        self.save_all(&records)?;
        Ok(Some(updated))
    }

    /// Remove every record with exactly the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn delete(&self, id: &str) -> Result<Vec<T>> {
        self.try_delete(id).map(|(records, _)| records)
    }

    /// Like [`delete`](Self::delete), also reporting how many records went.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn try_delete(&self, id: &str) -> Result<(Vec<T>, usize)> {
        let mut records = self.get_all()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = before - records.len();
        if removed > 0 {
            self.save_all(&records)?;
        }
        Ok((records, removed))
    }

    /// Write an empty array if the key holds nothing, returning whether a
    /// write happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn initialize_if_empty(&self) -> Result<bool> {
        if self.is_initialized()? {
            return Ok(false);
        }
        self.save_all(&[])?;
        Ok(true)
    }
}
