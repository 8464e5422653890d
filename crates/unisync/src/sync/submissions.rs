//! Student to faculty submission connector.

use tracing::{debug, info};

use super::{missing_by_id, SyncOptions, SyncReport};
use crate::error::Result;
use crate::model::{NotificationKind, Submission};
use crate::portal::{FacultyStore, StudentStore};

/// Student submissions the faculty portal has not seen yet, converted to
/// the faculty shape. Writes nothing.
///
/// # Errors
///
/// Returns an error if either collection cannot be read.
pub fn pending_submissions(
    student: &StudentStore,
    faculty: &FacultyStore,
) -> Result<Vec<Submission>> {
    let handed_in = student.submissions().get_all()?;
    let received = faculty.submissions().get_all()?;
    Ok(missing_by_id(&handed_in, &received)
        .into_iter()
        .map(Submission::from)
        .collect())
}

/// Copy new student submissions into the faculty collection as `submitted`.
///
/// # Errors
///
/// Returns an error if any storage read or write fails.
pub fn sync_submissions(
    student: &StudentStore,
    faculty: &FacultyStore,
    options: SyncOptions,
) -> Result<SyncReport> {
    let new_submissions = pending_submissions(student, faculty)?;
    if new_submissions.is_empty() {
        debug!("Faculty submissions already up to date");
        return Ok(SyncReport::default());
    }

    let mut report = SyncReport {
        synced_ids: new_submissions.iter().map(|s| s.id.clone()).collect(),
        notifications: 0,
    };
    faculty.submissions().extend(new_submissions.iter().cloned())?;

    if options.notify {
        for submission in &new_submissions {
            faculty.notify(
                NotificationKind::Submission,
                "New submission",
                format!(
                    "{} submitted work for assignment {}.",
                    submission.student_name, submission.assignment_id
                ),
            )?;
            report.notifications += 1;
        }
    }

    info!("Synced {} submissions to the faculty portal", report.synced());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::JsonStore;
    use crate::model::{StudentSubmission, SubmissionStatus};

    fn handed_in(id: &str) -> StudentSubmission {
        StudentSubmission {
            id: id.to_string(),
            assignment_id: "a1".to_string(),
            assignment_title: "HW1".to_string(),
            student_id: "stu-1".to_string(),
            student_name: "Lee".to_string(),
            submission_date: "2024-01-02".to_string(),
            content: Some("Answers".to_string()),
            attachments: Vec::new(),
            is_group_submission: true,
            group_members: Some(vec!["stu-1".to_string(), "stu-2".to_string()]),
        }
    }

    #[test]
    fn test_sync_converts_and_notifies() {
        let store = JsonStore::in_memory();
        let student = StudentStore::new(store.clone());
        let faculty = FacultyStore::new(store);
        student.submissions().save_all(&[handed_in("s1")]).unwrap();

        let report = sync_submissions(&student, &faculty, SyncOptions::default()).unwrap();
        assert_eq!(report.synced_ids, vec!["s1".to_string()]);
        assert_eq!(report.notifications, 1);

        let received = faculty.submissions().get_all().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].status, SubmissionStatus::Submitted);
        assert!(received[0].score.is_none());
        assert_eq!(received[0].group_members.as_ref().map(Vec::len), Some(2));
        assert_eq!(received[0].content.as_deref(), Some("Answers"));

        let inbox = faculty.notifications().get_all().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::Submission);
    }

    #[test]
    fn test_graded_faculty_copy_survives_resync() {
        let store = JsonStore::in_memory();
        let student = StudentStore::new(store.clone());
        let faculty = FacultyStore::new(store);
        student.submissions().save_all(&[handed_in("s1")]).unwrap();
        sync_submissions(&student, &faculty, SyncOptions::default()).unwrap();
        faculty.grade_submission("s1", 75, None).unwrap();

        let report = sync_submissions(&student, &faculty, SyncOptions::default()).unwrap();
        assert!(report.is_empty());
        let stored = faculty.submissions().get_by_id("s1").unwrap().unwrap();
        assert_eq!(stored.status, SubmissionStatus::Graded);
        assert_eq!(stored.score, Some(75));
    }
}
