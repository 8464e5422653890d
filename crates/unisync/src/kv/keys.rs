//! Fixed storage keys, one per collection.

/// Shared admin-side collections owned by the connector service.
pub const TICKETS: &str = "tickets";
/// Departments.
pub const DEPARTMENTS: &str = "departments";
/// Faculty members.
pub const FACULTY: &str = "faculty";
/// Enrolled students.
pub const STUDENTS: &str = "students";
/// Course catalogue.
pub const COURSES: &str = "courses";
/// Student batches.
pub const BATCHES: &str = "batches";
/// Class schedules.
pub const SCHEDULES: &str = "schedules";

/// Courses a student is enrolled in.
pub const STUDENT_COURSES: &str = "student_courses";
/// The student's view of assignments.
pub const STUDENT_ASSIGNMENTS: &str = "student_assignments";
/// Work the student has handed in.
pub const STUDENT_SUBMISSIONS: &str = "student_submissions";
/// Student inbox.
pub const STUDENT_NOTIFICATIONS: &str = "student_notifications";
/// Student profile object.
pub const STUDENT_PROFILE: &str = "student_profile";

/// Courses a faculty member teaches.
pub const FACULTY_COURSES: &str = "faculty_courses";
/// Assignments authored by faculty.
pub const FACULTY_ASSIGNMENTS: &str = "faculty_assignments";
/// Submissions as seen by faculty for grading.
pub const FACULTY_SUBMISSIONS: &str = "faculty_submissions";
/// Faculty inbox.
pub const FACULTY_NOTIFICATIONS: &str = "faculty_notifications";
/// Faculty profile object.
pub const FACULTY_PROFILE: &str = "faculty_profile";

/// Admin inbox.
pub const ADMIN_NOTIFICATIONS: &str = "admin_notifications";
/// Admin profile object.
pub const ADMIN_PROFILE: &str = "admin_profile";

/// Every per-portal collection key that holds an array.
pub const PORTAL_COLLECTIONS: &[&str] = &[
    STUDENT_COURSES,
    STUDENT_ASSIGNMENTS,
    STUDENT_SUBMISSIONS,
    STUDENT_NOTIFICATIONS,
    FACULTY_COURSES,
    FACULTY_ASSIGNMENTS,
    FACULTY_SUBMISSIONS,
    FACULTY_NOTIFICATIONS,
    ADMIN_NOTIFICATIONS,
];
