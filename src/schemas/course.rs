use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Course, CourseListing, Schedule};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, max = 255, message = "title must be 1 to 255 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) schedule: Option<Schedule>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub(crate) price: f64,
    #[serde(default)]
    #[serde(alias = "teacherId")]
    pub(crate) teacher_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct InviteRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) schedule: Option<Schedule>,
    pub(crate) school_id: Option<String>,
    pub(crate) teacher_id: Option<String>,
    pub(crate) price: f64,
    pub(crate) teacher_name: Option<String>,
    pub(crate) teacher_email: Option<String>,
    pub(crate) school_name: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            schedule: course.schedule.map(|schedule| schedule.0),
            school_id: course.school_id,
            teacher_id: course.teacher_id,
            price: course.price,
            teacher_name: None,
            teacher_email: None,
            school_name: None,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }

    pub(crate) fn from_listing(listing: CourseListing) -> Self {
        Self {
            teacher_name: listing.teacher_name,
            teacher_email: listing.teacher_email,
            school_name: listing.school_name,
            ..Self::from_db(listing.course)
        }
    }
}
