//! Submitted work, as handed in by students and as graded by faculty.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grading state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Waiting for a grade.
    #[default]
    Submitted,
    /// Graded.
    Graded,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Graded => write!(f, "graded"),
        }
    }
}

/// Work as handed in from the student portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubmission {
    /// Submission identifier, shared with the faculty copy.
    pub id: String,
    /// The assignment this answers. Not checked against any collection.
    pub assignment_id: String,
    /// Assignment title at the time of submission.
    pub assignment_title: String,
    /// Submitting student.
    pub student_id: String,
    /// Submitting student's name.
    pub student_name: String,
    /// Date the work was handed in.
    pub submission_date: String,
    /// Inline answer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Attachment names or links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    /// Whether this was handed in for a group.
    #[serde(default)]
    pub is_group_submission: bool,
    /// Other members of the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_members: Option<Vec<String>>,
}

/// A submission as seen by faculty for grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Submission identifier.
    pub id: String,
    /// The assignment this answers.
    pub assignment_id: String,
    /// Submitting student.
    pub student_id: String,
    /// Submitting student's name.
    pub student_name: String,
    /// Date the work was handed in.
    pub submission_date: String,
    /// Grading state.
    pub status: SubmissionStatus,
    /// Score once graded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Grader feedback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Whether this was handed in for a group.
    #[serde(default)]
    pub is_group_submission: bool,
    /// Other members of the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_members: Option<Vec<String>>,
    /// Inline answer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<&StudentSubmission> for Submission {
    fn from(submission: &StudentSubmission) -> Self {
        Self {
            id: submission.id.clone(),
            assignment_id: submission.assignment_id.clone(),
            student_id: submission.student_id.clone(),
            student_name: submission.student_name.clone(),
            submission_date: submission.submission_date.clone(),
            status: SubmissionStatus::Submitted,
            score: None,
            feedback: None,
            is_group_submission: submission.is_group_submission,
            group_members: submission.group_members.clone(),
            content: submission.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handed_in() -> StudentSubmission {
        StudentSubmission {
            id: "s1".to_string(),
            assignment_id: "a1".to_string(),
            assignment_title: "HW1".to_string(),
            student_id: "stu-7".to_string(),
            student_name: "Lee".to_string(),
            submission_date: "2024-01-02".to_string(),
            content: Some("answers".to_string()),
            attachments: Vec::new(),
            is_group_submission: true,
            group_members: Some(vec!["stu-8".to_string()]),
        }
    }

    #[test]
    fn test_conversion_starts_ungraded() {
        let faculty_copy = Submission::from(&handed_in());
        assert_eq!(faculty_copy.id, "s1");
        assert_eq!(faculty_copy.status, SubmissionStatus::Submitted);
        assert!(faculty_copy.score.is_none());
        assert!(faculty_copy.feedback.is_none());
        assert_eq!(faculty_copy.group_members, Some(vec!["stu-8".to_string()]));
        assert_eq!(faculty_copy.content.as_deref(), Some("answers"));
    }

    #[test]
    fn test_submission_json_field_names() {
        let value = serde_json::to_value(Submission::from(&handed_in())).unwrap();
        assert_eq!(value["assignmentId"], "a1");
        assert_eq!(value["status"], "submitted");
        assert_eq!(value["isGroupSubmission"], true);
        assert!(value.get("score").is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SubmissionStatus::Graded.to_string(), "graded");
    }
}
