use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{School, TeacherListing};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TeacherCreate {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub(crate) password: String,
    #[serde(default)]
    #[serde(alias = "fullName")]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) bio: Option<String>,
    #[serde(default)]
    pub(crate) subjects: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherResponse {
    pub(crate) user_id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) school_id: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) subjects: Vec<String>,
}

impl TeacherResponse {
    pub(crate) fn from_db(teacher: TeacherListing) -> Self {
        Self {
            user_id: teacher.user_id,
            email: teacher.email,
            name: teacher.name,
            school_id: teacher.school_id,
            bio: teacher.bio,
            subjects: teacher.subjects.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SchoolResponse {
    pub(crate) id: String,
    pub(crate) admin_user_id: String,
    pub(crate) name: String,
    pub(crate) city: Option<String>,
    pub(crate) address: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) is_verified: bool,
    pub(crate) rating_avg: f64,
    pub(crate) rating_count: i32,
    pub(crate) created_at: String,
}

impl SchoolResponse {
    pub(crate) fn from_db(school: School) -> Self {
        Self {
            id: school.id,
            admin_user_id: school.admin_user_id,
            name: school.name,
            city: school.city,
            address: school.address,
            phone: school.phone,
            is_verified: school.is_verified,
            rating_avg: school.rating_avg,
            rating_count: school.rating_count,
            created_at: format_primitive(school.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SchoolDetailResponse {
    #[serde(flatten)]
    pub(crate) school: SchoolResponse,
    pub(crate) teachers: Vec<TeacherResponse>,
}
