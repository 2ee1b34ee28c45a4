pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod health;
pub(crate) mod schools;
pub(crate) mod students;
pub(crate) mod teacher_profiles;
pub(crate) mod users;
