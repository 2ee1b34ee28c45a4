use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{StudentProfile, User};
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub(crate) password: String,
    #[serde(default)]
    #[serde(alias = "fullName")]
    #[validate(length(max = 255, message = "name is too long"))]
    pub(crate) name: Option<String>,
    #[serde(default = "default_user_role")]
    pub(crate) role: UserRole,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProfileUpdate {
    #[serde(default)]
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentProfileResponse {
    pub(crate) parent_name: Option<String>,
    pub(crate) grade_level: Option<String>,
    pub(crate) school_id: Option<String>,
    pub(crate) teacher_id: Option<String>,
}

impl StudentProfileResponse {
    pub(crate) fn from_db(profile: StudentProfile) -> Self {
        Self {
            parent_name: profile.parent_name,
            grade_level: profile.grade_level,
            school_id: profile.school_id,
            teacher_id: profile.teacher_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) student_profile: Option<StudentProfileResponse>,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
            student_profile: None,
        }
    }

    pub(crate) fn with_student_profile(mut self, profile: Option<StudentProfile>) -> Self {
        self.student_profile = profile.map(StudentProfileResponse::from_db);
        self
    }
}

/// Lowercased, trimmed form used for storage and lookups.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn default_user_role() -> UserRole {
    UserRole::Student
}
