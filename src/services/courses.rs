use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Course, CourseListing, Schedule};
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::courses::CreateCourse;
use crate::services::course_access::{self, Actor};
use crate::services::errors::{is_foreign_key_violation, ServiceError};

pub(crate) struct NewCourse<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) schedule: Option<Schedule>,
    pub(crate) price: f64,
    /// Required when a school admin creates the course, ignored for teachers.
    pub(crate) teacher_id: Option<&'a str>,
}

pub(crate) async fn create_course(
    pool: &PgPool,
    actor: Actor<'_>,
    new_course: NewCourse<'_>,
) -> Result<Course, ServiceError> {
    let title = new_course.title.trim();
    if title.is_empty() {
        return Err(ServiceError::InvalidArgument("Course title must not be empty"));
    }
    if !new_course.price.is_finite() || new_course.price < 0.0 {
        return Err(ServiceError::InvalidArgument("Course price must be a non-negative number"));
    }

    let now = primitive_now_utc();
    let course_id = Uuid::new_v4().to_string();

    let course = match actor.role {
        UserRole::Teacher => {
            let mut tx = pool.begin().await?;
            repositories::teacher_profiles::ensure_exists(&mut *tx, actor.id, now).await?;
            let course = repositories::courses::create(
                &mut *tx,
                CreateCourse {
                    id: &course_id,
                    title,
                    description: new_course.description,
                    schedule: new_course.schedule,
                    school_id: None,
                    teacher_id: Some(actor.id),
                    price: new_course.price,
                    created_at: now,
                },
            )
            .await?;
            tx.commit().await?;
            course
        }
        UserRole::SchoolAdmin => {
            let teacher_id = new_course
                .teacher_id
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or(ServiceError::InvalidArgument("teacher_id is required for school courses"))?;
            let school_id = course_access::admin_school_id(pool, actor.id).await?;

            repositories::courses::create(
                pool,
                CreateCourse {
                    id: &course_id,
                    title,
                    description: new_course.description,
                    schedule: new_course.schedule,
                    school_id: Some(&school_id),
                    teacher_id: Some(teacher_id),
                    price: new_course.price,
                    created_at: now,
                },
            )
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    ServiceError::InvalidArgument("teacher_id does not reference an existing user")
                } else {
                    ServiceError::Database(err)
                }
            })?
        }
        UserRole::Admin | UserRole::Student => {
            return Err(ServiceError::Unauthorized(
                "Only teachers and school administrators can create courses",
            ));
        }
    };

    tracing::info!(
        actor_id = %actor.id,
        course_id = %course.id,
        school_id = ?course.school_id,
        teacher_id = ?course.teacher_id,
        action = "course_create",
        "Course created"
    );

    Ok(course)
}

pub(crate) async fn list_courses(
    pool: &PgPool,
    actor: Actor<'_>,
) -> Result<Vec<CourseListing>, ServiceError> {
    let admin_school = match actor.role {
        UserRole::SchoolAdmin => {
            repositories::schools::find_by_admin(pool, actor.id).await?.map(|school| school.id)
        }
        UserRole::Admin | UserRole::Teacher | UserRole::Student => None,
    };

    let Some(filter) = course_access::listing_filter(actor, admin_school.as_deref()) else {
        return Ok(Vec::new());
    };

    Ok(repositories::courses::list(pool, filter).await?)
}
