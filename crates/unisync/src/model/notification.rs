//! Inbox notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// General information.
    #[default]
    Info,
    /// A new or changed assignment.
    Assignment,
    /// Work was handed in.
    Submission,
    /// Work was graded.
    Grade,
    /// Ticket activity.
    Ticket,
}

/// A message in one portal's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// When it was raised.
    pub created_at: DateTime<Utc>,
    /// Whether the user has seen it.
    #[serde(default)]
    pub read: bool,
    /// Where to go for details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Notification {
    /// Create an unread notification stamped with the current time.
    #[must_use]
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            message: message.into(),
            kind,
            created_at: Utc::now(),
            read: false,
            link: None,
        }
    }
}
