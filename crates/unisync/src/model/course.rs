//! Course records as the student and faculty portals keep them.

use serde::{Deserialize, Serialize};

/// A course on a student's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    /// Course identifier.
    pub id: String,
    /// Catalogue code, e.g. `CS101`.
    pub code: String,
    /// Course title.
    pub name: String,
    /// Teaching faculty member.
    pub instructor: String,
    /// Credit hours.
    pub credits: u8,
}

/// A course on a faculty member's teaching load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaughtCourse {
    /// Course identifier.
    pub id: String,
    /// Catalogue code.
    pub code: String,
    /// Course title.
    pub name: String,
    /// Term label, e.g. `Fall 2024`.
    pub semester: String,
    /// Number of enrolled students.
    #[serde(default)]
    pub enrolled_count: u32,
}
