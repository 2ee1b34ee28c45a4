pub(crate) mod accounts;
pub(crate) mod course_access;
pub(crate) mod courses;
pub(crate) mod enrollment_lifecycle;
pub(crate) mod enrollments;
pub(crate) mod errors;
pub(crate) mod schools;
pub(crate) mod student_linkage;
