//! Read-time joins over the normalized admin records.
//!
//! Stored records carry ids only; these views attach display names. A
//! dangling reference resolves to `None` rather than an error.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Batch, Course, Department, Faculty, Record, Schedule};

/// A course with its department and instructor names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    /// The stored course.
    #[serde(flatten)]
    pub course: Course,
    /// Name of the owning department.
    pub department_name: Option<String>,
    /// Name of the assigned faculty member.
    pub faculty_name: Option<String>,
}

/// A schedule slot with course, instructor and batch names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    /// The stored slot.
    #[serde(flatten)]
    pub schedule: Schedule,
    /// Name of the scheduled course.
    pub course_name: Option<String>,
    /// Name of the teaching faculty member.
    pub faculty_name: Option<String>,
    /// Name of the attending batch.
    pub batch_name: Option<String>,
}

/// Map ids to names. With duplicate ids the first record wins, matching
/// `get_by_id`.
fn names_by_id<'a, T: Record>(
    records: &'a [T],
    name: impl Fn(&'a T) -> &'a str,
) -> HashMap<&'a str, &'a str> {
    let mut names = HashMap::with_capacity(records.len());
    for record in records {
        names.entry(record.id()).or_insert_with(|| name(record));
    }
    names
}

fn lookup(names: &HashMap<&str, &str>, id: &str) -> Option<String> {
    names.get(id).map(|n| (*n).to_string())
}

/// Resolve department and faculty names for each course.
#[must_use]
pub fn join_courses(
    courses: Vec<Course>,
    departments: &[Department],
    faculty: &[Faculty],
) -> Vec<CourseView> {
    let departments = names_by_id(departments, |d| d.name.as_str());
    let faculty = names_by_id(faculty, |f| f.name.as_str());

    courses
        .into_iter()
        .map(|course| CourseView {
            department_name: lookup(&departments, &course.department_id),
            faculty_name: course
                .faculty_id
                .as_deref()
                .and_then(|id| lookup(&faculty, id)),
            course,
        })
        .collect()
}

/// Resolve course, faculty and batch names for each schedule slot.
#[must_use]
pub fn join_schedules(
    schedules: Vec<Schedule>,
    courses: &[Course],
    faculty: &[Faculty],
    batches: &[Batch],
) -> Vec<ScheduleView> {
    let courses = names_by_id(courses, |c| c.name.as_str());
    let faculty = names_by_id(faculty, |f| f.name.as_str());
    let batches = names_by_id(batches, |b| b.name.as_str());

    schedules
        .into_iter()
        .map(|schedule| ScheduleView {
            course_name: lookup(&courses, &schedule.course_id),
            faculty_name: lookup(&faculty, &schedule.faculty_id),
            batch_name: lookup(&batches, &schedule.batch_id),
            schedule,
        })
        .collect()
}
