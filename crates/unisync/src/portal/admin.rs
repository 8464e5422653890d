//! Admin portal storage.
//!
//! The admin's shared records live in the connector service; this store only
//! holds the admin's own inbox and profile.

use super::{load_profile, mark_read, push_notification, unread, Collection};
use crate::error::Result;
use crate::kv::{keys, JsonStore};
use crate::model::{Notification, NotificationKind, Profile};

/// Collections owned by the admin portal.
#[derive(Debug, Clone)]
pub struct AdminStore {
    store: JsonStore,
}

impl AdminStore {
    /// Bind the admin collections to a store.
    #[must_use]
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Inbox.
    #[must_use]
    pub fn notifications(&self) -> Collection<Notification> {
        Collection::new(self.store.clone(), keys::ADMIN_NOTIFICATIONS)
    }

    /// Add a notification to the admin inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read or write fails.
    pub fn notify(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Notification> {
        push_notification(&self.notifications(), kind, title, message)
    }

    /// Mark a notification as read, returning whether it was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read or write fails.
    pub fn mark_notification_read(&self, id: &str) -> Result<bool> {
        mark_read(&self.notifications(), id)
    }

    /// Unread notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn unread_notifications(&self) -> Result<Vec<Notification>> {
        unread(&self.notifications())
    }

    /// The stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails or the value is corrupt.
    pub fn profile(&self) -> Result<Option<Profile>> {
        load_profile(&self.store, keys::ADMIN_PROFILE)
    }

    /// Replace the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.store.set(keys::ADMIN_PROFILE, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_inbox() {
        let a = AdminStore::new(JsonStore::in_memory());
        let n = a
            .notify(NotificationKind::Ticket, "New ticket", "Wi-Fi down")
            .unwrap();
        assert_eq!(a.unread_notifications().unwrap().len(), 1);
        assert!(a.mark_notification_read(&n.id).unwrap());
        assert!(a.unread_notifications().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_profile_is_an_error() {
        let store = JsonStore::in_memory();
        store.set(keys::ADMIN_PROFILE, &vec![1, 2]).unwrap();
        let a = AdminStore::new(store);
        assert!(a.profile().unwrap_err().is_corrupt_data());
    }
}
