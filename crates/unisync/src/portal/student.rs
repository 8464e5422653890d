//! Student portal storage.

use tracing::info;

use super::{load_profile, mark_read, push_notification, unread, Collection};
use crate::error::Result;
use crate::kv::{keys, JsonStore};
use crate::model::{
    AssignmentStatus, EnrolledCourse, Notification, NotificationKind, Profile, StudentAssignment,
    StudentSubmission,
};

/// Collections owned by the student portal.
#[derive(Debug, Clone)]
pub struct StudentStore {
    store: JsonStore,
}

impl StudentStore {
    /// Bind the student collections to a store.
    #[must_use]
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Enrolled courses.
    #[must_use]
    pub fn courses(&self) -> Collection<EnrolledCourse> {
        Collection::new(self.store.clone(), keys::STUDENT_COURSES)
    }

    /// Assignments mirrored from faculty.
    #[must_use]
    pub fn assignments(&self) -> Collection<StudentAssignment> {
        Collection::new(self.store.clone(), keys::STUDENT_ASSIGNMENTS)
    }

    /// Work handed in.
    #[must_use]
    pub fn submissions(&self) -> Collection<StudentSubmission> {
        Collection::new(self.store.clone(), keys::STUDENT_SUBMISSIONS)
    }

    /// Inbox.
    #[must_use]
    pub fn notifications(&self) -> Collection<Notification> {
        Collection::new(self.store.clone(), keys::STUDENT_NOTIFICATIONS)
    }

    /// Enrol in a course. Enrolling twice in the same course id is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read or write fails.
    pub fn enroll(&self, course: EnrolledCourse) -> Result<Vec<EnrolledCourse>> {
        self.courses().add_unique(course)
    }

    /// Drop a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read or write fails.
    pub fn drop_course(&self, course_id: &str) -> Result<Vec<EnrolledCourse>> {
        self.courses().delete(course_id)
    }

    /// Hand in work.
    ///
    /// Appends the submission, marks the mirrored assignment as submitted if
    /// it exists, and adds a confirmation to the inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if any storage read or write fails.
    pub fn submit_assignment(&self, submission: StudentSubmission) -> Result<Vec<StudentSubmission>> {
        let assignment_id = submission.assignment_id.clone();
        let title = submission.assignment_title.clone();
        let all = self.submissions().add(submission)?;

        self.assignments().update_with(&assignment_id, |a| {
            a.status = AssignmentStatus::Submitted;
        })?;

        self.notify(
            NotificationKind::Submission,
            "Assignment submitted",
            format!("Your submission for \"{title}\" was received."),
        )?;
        info!("Student submission recorded for assignment {}", assignment_id);
        Ok(all)
    }

    /// Add a notification to the student inbox.
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
        load_profile(&self.store, keys::STUDENT_PROFILE)
    }

    /// Replace the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.store.set(keys::STUDENT_PROFILE, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Portal;

    fn store() -> StudentStore {
        StudentStore::new(JsonStore::in_memory())
    }

    fn course(id: &str) -> EnrolledCourse {
        EnrolledCourse {
            id: id.to_string(),
            code: "CS101".to_string(),
            name: "Intro".to_string(),
            instructor: "Dr. Rao".to_string(),
            credits: 4,
        }
    }

    fn pending(id: &str) -> StudentAssignment {
        StudentAssignment {
            id: id.to_string(),
            title: "HW1".to_string(),
            course_id: "C1".to_string(),
            course_name: "CS101".to_string(),
            content: "Do ch.1".to_string(),
            due_date: "2024-01-01".to_string(),
            status: AssignmentStatus::Pending,
            score: None,
            max_score: 100,
            is_group_assignment: false,
            max_group_size: None,
            attachments: Vec::new(),
        }
    }

    fn submission(id: &str, assignment_id: &str) -> StudentSubmission {
        StudentSubmission {
            id: id.to_string(),
            assignment_id: assignment_id.to_string(),
            assignment_title: "HW1".to_string(),
            student_id: "stu-1".to_string(),
            student_name: "Lee".to_string(),
            submission_date: "2024-01-01".to_string(),
            content: None,
            attachments: vec!["hw1.pdf".to_string()],
            is_group_submission: false,
            group_members: None,
        }
    }

    #[test]
    fn test_enroll_is_deduplicated() {
        let s = store();
        s.enroll(course("c1")).unwrap();
        let all = s.enroll(course("c1")).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_drop_course() {
        let s = store();
        s.enroll(course("c1")).unwrap();
        s.enroll(course("c2")).unwrap();
        let all = s.drop_course("c1").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "c2");
    }

    #[test]
    fn test_submit_marks_assignment_and_notifies() {
        let s = store();
        s.assignments().add(pending("a1")).unwrap();

        let all = s.submit_assignment(submission("s1", "a1")).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            s.assignments().get_by_id("a1").unwrap().unwrap().status,
            AssignmentStatus::Submitted
        );
        let inbox = s.notifications().get_all().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::Submission);
    }

    #[test]
    fn test_submit_without_mirrored_assignment() {
        let s = store();
        s.submit_assignment(submission("s1", "missing")).unwrap();
        assert!(s.assignments().get_all().unwrap().is_empty());
        assert_eq!(s.submissions().get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_notifications_read_state() {
        let s = store();
        let first = s.notify(NotificationKind::Info, "Welcome", "Hello").unwrap();
        s.notify(NotificationKind::Info, "Reminder", "Due soon").unwrap();
        assert_eq!(s.unread_notifications().unwrap().len(), 2);

        assert!(s.mark_notification_read(&first.id).unwrap());
        assert!(!s.mark_notification_read("unknown").unwrap());

        let unread = s.unread_notifications().unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "Reminder");
    }

    #[test]
    fn test_profile_roundtrip() {
        let s = store();
        assert!(s.profile().unwrap().is_none());

        let profile = Profile {
            id: "stu-1".to_string(),
            name: "Lee".to_string(),
            email: "lee@uni.edu".to_string(),
            role: Portal::Student,
            department: Some("CSE".to_string()),
            phone: None,
        };
        s.save_profile(&profile).unwrap();
        assert_eq!(s.profile().unwrap(), Some(profile));
    }
}
