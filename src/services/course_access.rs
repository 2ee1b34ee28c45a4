use sqlx::PgPool;

use crate::db::models::{Course, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::courses::CourseFilter;
use crate::services::errors::ServiceError;

/// The caller of an operation: who they are and what they may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Actor<'a> {
    pub(crate) id: &'a str,
    pub(crate) role: UserRole,
}

impl<'a> From<&'a User> for Actor<'a> {
    fn from(user: &'a User) -> Self {
        Self { id: &user.id, role: user.role }
    }
}

/// A teacher manages the courses they teach; a school admin manages every
/// course of their school. Nobody else manages courses.
pub(crate) fn can_manage_course(
    actor: Actor<'_>,
    admin_school_id: Option<&str>,
    course: &Course,
) -> bool {
    match actor.role {
        UserRole::Teacher => course.teacher_id.as_deref() == Some(actor.id),
        UserRole::SchoolAdmin => match (admin_school_id, course.school_id.as_deref()) {
            (Some(admin_school), Some(course_school)) => admin_school == course_school,
            _ => false,
        },
        UserRole::Admin | UserRole::Student => false,
    }
}

/// Course listing scope per role. `None` means the caller sees nothing.
pub(crate) fn listing_filter<'a>(
    actor: Actor<'a>,
    admin_school_id: Option<&'a str>,
) -> Option<CourseFilter<'a>> {
    match actor.role {
        UserRole::Admin | UserRole::Student => Some(CourseFilter::All),
        UserRole::Teacher => Some(CourseFilter::Teacher(actor.id)),
        UserRole::SchoolAdmin => admin_school_id.map(CourseFilter::School),
    }
}

pub(crate) fn is_course_manager_role(role: UserRole) -> bool {
    match role {
        UserRole::Teacher | UserRole::SchoolAdmin => true,
        UserRole::Admin | UserRole::Student => false,
    }
}

/// Resolves the school a school admin runs. Every school admin is provisioned
/// with one, so a miss is reported as not found.
pub(crate) async fn admin_school_id(pool: &PgPool, admin_id: &str) -> Result<String, ServiceError> {
    repositories::schools::find_by_admin(pool, admin_id)
        .await?
        .map(|school| school.id)
        .ok_or(ServiceError::NotFound("School not found for this administrator"))
}

pub(crate) async fn authorize_course_manager(
    pool: &PgPool,
    actor: Actor<'_>,
    course: &Course,
) -> Result<(), ServiceError> {
    let admin_school = match actor.role {
        UserRole::SchoolAdmin => Some(admin_school_id(pool, actor.id).await?),
        UserRole::Admin | UserRole::Teacher | UserRole::Student => None,
    };

    if can_manage_course(actor, admin_school.as_deref(), course) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized("Not allowed to manage this course"))
    }
}
