//! Administrative records shared through the connector service.
//!
//! These carry foreign-key ids only. Display names are resolved at read time
//! by the connector's views, so renaming a department or faculty member
//! cannot leave stale copies behind.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// An academic department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Department identifier.
    pub id: String,
    /// Short code, e.g. `CSE`.
    pub code: String,
    /// Full name.
    pub name: String,
    /// Faculty member heading the department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_faculty_id: Option<String>,
}

/// A faculty member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    /// Faculty identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Home department.
    pub department_id: String,
    /// Title, e.g. `Associate Professor`.
    pub designation: String,
}

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Student identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Registration number.
    pub roll_number: String,
    /// Home department.
    pub department_id: String,
    /// Batch the student belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

/// A catalogue course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course identifier.
    pub id: String,
    /// Catalogue code.
    pub code: String,
    /// Course title.
    pub name: String,
    /// Credit hours.
    pub credits: u8,
    /// Offering department.
    pub department_id: String,
    /// Assigned faculty member, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
}

/// An intake cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Batch identifier.
    pub id: String,
    /// Label, e.g. `CSE 2024`.
    pub name: String,
    /// Owning department.
    pub department_id: String,
    /// First academic year.
    pub start_year: u16,
    /// Expected graduation year.
    pub end_year: u16,
}

/// A weekly teaching slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Schedule identifier.
    pub id: String,
    /// Course taught in this slot.
    pub course_id: String,
    /// Faculty member teaching.
    pub faculty_id: String,
    /// Batch attending.
    pub batch_id: String,
    /// Day of the week.
    pub day: Weekday,
    /// Start time, `HH:MM`.
    pub start_time: String,
    /// End time, `HH:MM`.
    pub end_time: String,
    /// Room label.
    pub room: String,
}
