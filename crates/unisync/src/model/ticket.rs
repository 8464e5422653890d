//! Support tickets raised from any portal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, Portal};

/// Ticket workflow state.
///
/// Transitions are not restricted; any state may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    /// Newly raised.
    #[default]
    Open,
    /// Someone is working on it.
    InProgress,
    /// A fix or answer was provided.
    Resolved,
    /// No further action.
    Closed,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Resolved => write!(f, "resolved"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Ticket urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A reply appended to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    /// Response identifier.
    pub id: String,
    /// Reply text.
    pub content: String,
    /// Display name of the responder.
    pub responder_name: String,
    /// Identifier of the responder.
    pub responder_id: String,
    /// Portal the responder answered from.
    pub responder_role: Portal,
    /// When the reply was written.
    pub timestamp: DateTime<Utc>,
}

impl TicketResponse {
    /// Create a reply stamped with the current time.
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        responder_name: impl Into<String>,
        responder_id: impl Into<String>,
        responder_role: Portal,
    ) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            responder_name: responder_name.into(),
            responder_id: responder_id.into(),
            responder_role,
            timestamp: Utc::now(),
        }
    }
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket identifier.
    pub id: String,
    /// Short summary.
    pub title: String,
    /// Full description of the problem.
    pub description: String,
    /// Who raised the ticket.
    pub created_by: String,
    /// When the ticket was raised.
    pub created_at: DateTime<Utc>,
    /// Workflow state.
    pub status: TicketStatus,
    /// Who is handling the ticket, if anyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Portal the ticket was raised from.
    pub portal_type: Portal,
    /// Urgency.
    pub priority: Priority,
    /// Free-form category, e.g. "technical" or "academic".
    pub category: String,
    /// Replies in the order they were added.
    #[serde(default)]
    pub responses: Vec<TicketResponse>,
}

impl Ticket {
    /// Create an open ticket with a fresh id and the current time.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: impl Into<String>,
        portal_type: Portal,
        priority: Priority,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            created_by: created_by.into(),
            created_at: Utc::now(),
            status: TicketStatus::Open,
            assigned_to: None,
            portal_type,
            priority,
            category: category.into(),
            responses: Vec::new(),
        }
    }

    /// Whether the ticket still needs work.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, TicketStatus::Open | TicketStatus::InProgress)
    }
}

/// Criteria for listing tickets. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Only tickets raised from this portal.
    pub portal: Option<Portal>,
    /// Only tickets in this state.
    pub status: Option<TicketStatus>,
    /// Only tickets with this priority.
    pub priority: Option<Priority>,
    /// Case-insensitive text to find in title, description or category.
    pub query: Option<String>,
}

impl TicketFilter {
    /// Check a ticket against every set criterion.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.portal.is_some_and(|p| p != ticket.portal_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != ticket.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != ticket.priority) {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                [&ticket.title, &ticket.description, &ticket.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}
