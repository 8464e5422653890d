//! Per-portal storage modules.
//!
//! Each portal owns its own set of keys. The student and faculty stores are
//! independent; the sync routines in [`crate::sync`] reconcile them.

pub mod admin;
pub mod collection;
pub mod faculty;
pub mod student;

use crate::error::Result;
use crate::kv::JsonStore;
use crate::model::{Notification, NotificationKind, Profile};

pub use admin::AdminStore;
pub use collection::Collection;
pub use faculty::FacultyStore;
pub use student::StudentStore;

/// Read the profile object stored under `key`.
fn load_profile(store: &JsonStore, key: &str) -> Result<Option<Profile>> {
    store.get(key)
}

/// Append a fresh notification to `inbox` and return it.
fn push_notification(
    inbox: &Collection<Notification>,
    kind: NotificationKind,
    title: impl Into<String>,
    message: impl Into<String>,
) -> Result<Notification> {
    let notification = Notification::new(kind, title, message);
    inbox.add(notification.clone())?;
    Ok(notification)
}

/// Mark one notification in `inbox` as read.
fn mark_read(inbox: &Collection<Notification>, id: &str) -> Result<bool> {
    Ok(inbox.update_with(id, |n| n.read = true)?.is_some())
}

/// Unread notifications in `inbox`, newest first.
fn unread(inbox: &Collection<Notification>) -> Result<Vec<Notification>> {
    let mut pending: Vec<_> = inbox.get_all()?.into_iter().filter(|n| !n.read).collect();
    pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(pending)
}
