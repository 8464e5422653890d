//! Faculty portal storage.

use tracing::info;

use super::{load_profile, mark_read, push_notification, unread, Collection, StudentStore};
use crate::error::Result;
use crate::kv::{keys, JsonStore};
use crate::model::{
    AssignmentStatus, FacultyAssignment, Notification, NotificationKind, Profile, Submission,
    SubmissionStatus, TaughtCourse,
};

/// Collections owned by the faculty portal.
#[derive(Debug, Clone)]
pub struct FacultyStore {
    store: JsonStore,
}

impl FacultyStore {
    /// Bind the faculty collections to a store.
    #[must_use]
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Courses taught.
    #[must_use]
    pub fn courses(&self) -> Collection<TaughtCourse> {
        Collection::new(self.store.clone(), keys::FACULTY_COURSES)
    }

    /// Authored assignments.
    #[must_use]
    pub fn assignments(&self) -> Collection<FacultyAssignment> {
        Collection::new(self.store.clone(), keys::FACULTY_ASSIGNMENTS)
    }

    /// Submissions awaiting or holding a grade.
    #[must_use]
    pub fn submissions(&self) -> Collection<Submission> {
        Collection::new(self.store.clone(), keys::FACULTY_SUBMISSIONS)
    }

    /// Inbox.
    #[must_use]
    pub fn notifications(&self) -> Collection<Notification> {
        Collection::new(self.store.clone(), keys::FACULTY_NOTIFICATIONS)
    }

    /// Publish an assignment. Always appends, even for a repeated id.
    ///
    /// # Errors
    ///
    /// Returns an error if any storage read or write fails.
    pub fn create_assignment(
        &self,
        assignment: FacultyAssignment,
    ) -> Result<Vec<FacultyAssignment>> {
        let message = format!(
            "\"{}\" for {} is due {}.",
            assignment.title, assignment.course_name, assignment.due_date
        );
        let all = self.assignments().add(assignment)?;
        self.notify(NotificationKind::Assignment, "Assignment created", message)?;
        Ok(all)
    }

    /// Grade a submission.
    ///
    /// Marks the submission graded, copies status and score onto the
    /// student's view of the assignment, and notifies the student. Returns
    /// `None` without writing anything when the submission id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if any storage read or write fails.
    pub fn grade_submission(
        &self,
        submission_id: &str,
        score: u32,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let Some(graded) = self.submissions().update_with(submission_id, |s| {
            s.status = SubmissionStatus::Graded;
            s.score = Some(score);
            s.feedback = feedback;
        })?
        else {
            return Ok(None);
        };

        let student = StudentStore::new(self.store.clone());
        let mirrored = student
            .assignments()
            .update_with(&graded.assignment_id, |a| {
                a.status = AssignmentStatus::Graded;
                a.score = Some(score);
            })?;

        let message = match &mirrored {
            Some(a) => format!("\"{}\" was graded: {score}/{}.", a.title, a.max_score),
            None => format!("Your submission {} was graded: {score}.", graded.id),
        };
        student.notify(NotificationKind::Grade, "Assignment graded", message)?;

        info!(
            "Graded submission {} from {} with {}",
            graded.id, graded.student_id, score
        );
        Ok(Some(graded))
    }

    /// Submissions for one assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn submissions_for(&self, assignment_id: &str) -> Result<Vec<Submission>> {
        Ok(self
            .submissions()
            .get_all()?
            .into_iter()
            .filter(|s| s.assignment_id == assignment_id)
            .collect())
    }

    /// Add a notification to the faculty inbox.
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
        load_profile(&self.store, keys::FACULTY_PROFILE)
    }

    /// Replace the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.store.set(keys::FACULTY_PROFILE, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentAssignment;

    fn assignment(id: &str) -> FacultyAssignment {
        FacultyAssignment {
            id: id.to_string(),
            title: "HW1".to_string(),
            course_id: "C1".to_string(),
            course_name: "CS101".to_string(),
            description: "Do ch.1".to_string(),
            due_date: "2024-01-01".to_string(),
            max_score: 100,
            is_group_assignment: false,
            max_group_size: None,
            attachments: Vec::new(),
        }
    }

    fn submission(id: &str, assignment_id: &str) -> Submission {
        Submission {
            id: id.to_string(),
            assignment_id: assignment_id.to_string(),
            student_id: "stu-1".to_string(),
            student_name: "Lee".to_string(),
            submission_date: "2024-01-01".to_string(),
            status: SubmissionStatus::Submitted,
            score: None,
            feedback: None,
            is_group_submission: false,
            group_members: None,
            content: None,
        }
    }

    #[test]
    fn test_create_assignment_appends_and_notifies() {
        let f = FacultyStore::new(JsonStore::in_memory());
        f.create_assignment(assignment("a1")).unwrap();
        let all = f.create_assignment(assignment("a1")).unwrap();

        assert_eq!(all.len(), 2);
        let inbox = f.notifications().get_all().unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox[0].message.contains("CS101"));
    }

    #[test]
    fn test_grade_submission_mirrors_to_student() {
        let store = JsonStore::in_memory();
        let f = FacultyStore::new(store.clone());
        let s = StudentStore::new(store);
        s.assignments()
            .add(StudentAssignment::from(&assignment("a1")))
            .unwrap();
        f.submissions().add(submission("s1", "a1")).unwrap();

        let graded = f
            .grade_submission("s1", 88, Some("Good work".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.score, Some(88));
        assert_eq!(graded.feedback.as_deref(), Some("Good work"));

        let mirrored = s.assignments().get_by_id("a1").unwrap().unwrap();
        assert_eq!(mirrored.status, AssignmentStatus::Graded);
        assert_eq!(mirrored.score, Some(88));

        let inbox = s.notifications().get_all().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::Grade);
        assert!(inbox[0].message.contains("88/100"));
    }

    #[test]
    fn test_grade_unknown_submission_writes_nothing() {
        let store = JsonStore::in_memory();
        let f = FacultyStore::new(store.clone());

        assert!(f.grade_submission("nope", 50, None).unwrap().is_none());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_submissions_for_assignment() {
        let f = FacultyStore::new(JsonStore::in_memory());
        f.submissions().add(submission("s1", "a1")).unwrap();
        f.submissions().add(submission("s2", "a2")).unwrap();
        f.submissions().add(submission("s3", "a1")).unwrap();

        let ids: Vec<_> = f
            .submissions_for("a1")
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["s1", "s3"]);
    }
}
