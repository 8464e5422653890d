//! Faculty to student assignment connector.

use tracing::{debug, info};

use super::{missing_by_id, SyncOptions, SyncReport};
use crate::error::Result;
use crate::model::{NotificationKind, StudentAssignment};
use crate::portal::{FacultyStore, StudentStore};

/// Faculty assignments the student portal has not seen yet, already
/// converted to the student shape. Writes nothing.
///
/// # Errors
///
/// Returns an error if either collection cannot be read.
pub fn pending_assignments(
    faculty: &FacultyStore,
    student: &StudentStore,
) -> Result<Vec<StudentAssignment>> {
    let authored = faculty.assignments().get_all()?;
    let mirrored = student.assignments().get_all()?;
    Ok(missing_by_id(&authored, &mirrored)
        .into_iter()
        .map(StudentAssignment::from)
        .collect())
}

/// Copy new faculty assignments into the student collection as `pending`.
///
/// # Errors
///
/// Returns an error if any storage read or write fails.
pub fn sync_assignments(
    faculty: &FacultyStore,
    student: &StudentStore,
    options: SyncOptions,
) -> Result<SyncReport> {
    let new_assignments = pending_assignments(faculty, student)?;
    if new_assignments.is_empty() {
        debug!("Student assignments already up to date");
        return Ok(SyncReport::default());
    }

    let mut report = SyncReport {
        synced_ids: new_assignments.iter().map(|a| a.id.clone()).collect(),
        notifications: 0,
    };
    student.assignments().extend(new_assignments.iter().cloned())?;

    if options.notify {
        for assignment in &new_assignments {
            student.notify(
                NotificationKind::Assignment,
                "New assignment",
                format!(
                    "\"{}\" has been posted for {}. Due {}.",
                    assignment.title, assignment.course_name, assignment.due_date
                ),
            )?;
            report.notifications += 1;
        }
    }

    info!("Synced {} assignments to the student portal", report.synced());
    Ok(report)
}
