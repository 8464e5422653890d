//! Assignments, as authored by faculty and as mirrored to students.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Progress of an assignment from the student's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// Not handed in yet.
    #[default]
    Pending,
    /// Handed in, awaiting a grade.
    Submitted,
    /// Graded by faculty.
    Graded,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Submitted => write!(f, "submitted"),
            Self::Graded => write!(f, "graded"),
        }
    }
}

/// An assignment as created in the faculty portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyAssignment {
    /// Assignment identifier, shared with the student mirror.
    pub id: String,
    /// Title.
    pub title: String,
    /// Course the assignment belongs to. Not checked against any collection.
    pub course_id: String,
    /// Course display name.
    pub course_name: String,
    /// Instructions.
    pub description: String,
    /// Due date as entered, e.g. `2024-01-01`.
    pub due_date: String,
    /// Highest attainable score.
    pub max_score: u32,
    /// Whether students may submit as a group.
    #[serde(default)]
    pub is_group_assignment: bool,
    /// Largest group allowed for group assignments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_group_size: Option<u32>,
    /// Attachment names or links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// The student-side copy of a [`FacultyAssignment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignment {
    /// Same identifier as the faculty assignment it mirrors.
    pub id: String,
    /// Title.
    pub title: String,
    /// Course identifier.
    pub course_id: String,
    /// Course display name.
    pub course_name: String,
    /// Instructions (the faculty `description`).
    pub content: String,
    /// Due date as entered.
    pub due_date: String,
    /// Where the student is with this assignment.
    pub status: AssignmentStatus,
    /// Score once graded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Highest attainable score.
    pub max_score: u32,
    /// Whether students may submit as a group.
    #[serde(default)]
    pub is_group_assignment: bool,
    /// Largest group allowed for group assignments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_group_size: Option<u32>,
    /// Attachment names or links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl From<&FacultyAssignment> for StudentAssignment {
    fn from(assignment: &FacultyAssignment) -> Self {
        Self {
            id: assignment.id.clone(),
            title: assignment.title.clone(),
            course_id: assignment.course_id.clone(),
            course_name: assignment.course_name.clone(),
            content: assignment.description.clone(),
            due_date: assignment.due_date.clone(),
            status: AssignmentStatus::Pending,
            score: None,
            max_score: assignment.max_score,
            is_group_assignment: assignment.is_group_assignment,
            max_group_size: assignment.max_group_size,
            attachments: assignment.attachments.clone(),
        }
    }
}
