use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{EnrollmentStatus, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct School {
    pub(crate) id: String,
    pub(crate) admin_user_id: String,
    pub(crate) name: String,
    pub(crate) city: Option<String>,
    pub(crate) address: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) is_verified: bool,
    pub(crate) rating_avg: f64,
    pub(crate) rating_count: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct TeacherProfile {
    pub(crate) user_id: String,
    pub(crate) school_id: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) subjects: Json<Vec<String>>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Teacher profile joined with the owning user, as listed to school admins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct TeacherListing {
    pub(crate) user_id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) school_id: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) subjects: Json<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentProfile {
    pub(crate) user_id: String,
    pub(crate) parent_name: Option<String>,
    pub(crate) grade_level: Option<String>,
    pub(crate) school_id: Option<String>,
    pub(crate) teacher_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct LinkedStudent {
    pub(crate) user_id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) grade_level: Option<String>,
    pub(crate) school_id: Option<String>,
    pub(crate) teacher_id: Option<String>,
}

/// Optional timetable attached to a course. Only presence of fields matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) days: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) end_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) schedule: Option<Json<Schedule>>,
    pub(crate) school_id: Option<String>,
    pub(crate) teacher_id: Option<String>,
    pub(crate) price: f64,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Course row with display names resolved from the teacher and school.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseListing {
    #[sqlx(flatten)]
    pub(crate) course: Course,
    pub(crate) teacher_name: Option<String>,
    pub(crate) teacher_email: Option<String>,
    pub(crate) school_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: String,
    pub(crate) student_user_id: String,
    pub(crate) course_id: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) enrolled_at: PrimitiveDateTime,
    pub(crate) decided_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct EnrollmentWithStudent {
    #[sqlx(flatten)]
    pub(crate) enrollment: Enrollment,
    pub(crate) student_name: String,
    pub(crate) student_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EnrollmentWithCourse {
    pub(crate) enrollment: Enrollment,
    pub(crate) course: CourseListing,
}
