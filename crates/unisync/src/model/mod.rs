//! Record types stored in the portal collections.
//!
//! Field names serialize in camelCase so stored JSON keeps the same shape the
//! portal pages read and write.

pub mod admin;
pub mod assignment;
pub mod course;
pub mod notification;
pub mod profile;
pub mod submission;
pub mod ticket;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use admin::{Batch, Course, Department, Faculty, Schedule, Student};
pub use assignment::{AssignmentStatus, FacultyAssignment, StudentAssignment};
pub use course::{EnrolledCourse, TaughtCourse};
pub use notification::{Notification, NotificationKind};
pub use profile::Profile;
pub use submission::{StudentSubmission, Submission, SubmissionStatus};
pub use ticket::{Priority, Ticket, TicketFilter, TicketResponse, TicketStatus};

/// A record that lives in a collection and is identified by a string `id`.
///
/// Uniqueness of `id` within a collection is a convention, not a guarantee.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// The record's identifier.
    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_record!(
    Batch,
    Course,
    Department,
    EnrolledCourse,
    Faculty,
    FacultyAssignment,
    Notification,
    Schedule,
    Student,
    StudentAssignment,
    StudentSubmission,
    Submission,
    TaughtCourse,
    Ticket,
);

/// One of the three user-facing role contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    /// Student portal.
    Student,
    /// Faculty portal.
    Faculty,
    /// Administration portal.
    Admin,
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Faculty => write!(f, "faculty"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Generate a fresh record identifier.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_display_matches_serde() {
        for portal in [Portal::Student, Portal::Faculty, Portal::Admin] {
            let json = serde_json::to_string(&portal).unwrap();
            assert_eq!(json, format!("\"{portal}\""));
        }
    }

    #[test]
    fn test_new_id_unique() {
        assert_ne!(new_id(), new_id());
    }
}
