use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{Enrollment, EnrollmentWithCourse, EnrollmentWithStudent, LinkedStudent};
use crate::db::types::EnrollmentStatus;
use crate::schemas::course::CourseResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct InvitationAnswer {
    pub(crate) accept: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentDecision {
    pub(crate) approve: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: String,
    pub(crate) student_user_id: String,
    pub(crate) course_id: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) enrolled_at: String,
    pub(crate) decided_at: Option<String>,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_user_id: enrollment.student_user_id,
            course_id: enrollment.course_id,
            status: enrollment.status,
            enrolled_at: format_primitive(enrollment.enrolled_at),
            decided_at: enrollment.decided_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentEnrollmentResponse {
    pub(crate) enrollment: EnrollmentResponse,
    pub(crate) course: CourseResponse,
}

impl StudentEnrollmentResponse {
    pub(crate) fn from_db(row: EnrollmentWithCourse) -> Self {
        Self {
            enrollment: EnrollmentResponse::from_db(row.enrollment),
            course: CourseResponse::from_listing(row.course),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseEnrollmentResponse {
    #[serde(flatten)]
    pub(crate) enrollment: EnrollmentResponse,
    pub(crate) student_name: String,
    pub(crate) student_email: String,
}

impl CourseEnrollmentResponse {
    pub(crate) fn from_db(row: EnrollmentWithStudent) -> Self {
        Self {
            enrollment: EnrollmentResponse::from_db(row.enrollment),
            student_name: row.student_name,
            student_email: row.student_email,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LinkedStudentResponse {
    pub(crate) user_id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) grade_level: Option<String>,
    pub(crate) school_id: Option<String>,
    pub(crate) teacher_id: Option<String>,
}

impl LinkedStudentResponse {
    pub(crate) fn from_db(student: LinkedStudent) -> Self {
        Self {
            user_id: student.user_id,
            email: student.email,
            name: student.name,
            grade_level: student.grade_level,
            school_id: student.school_id,
            teacher_id: student.teacher_id,
        }
    }
}
