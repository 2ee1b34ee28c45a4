use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::db::models::{School, TeacherListing};
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::teacher_profiles::CreateTeacherProfile;
use crate::services::accounts::{self, NewAccount};
use crate::services::course_access::{self, Actor};
use crate::services::errors::ServiceError;

pub(crate) struct NewTeacher<'a> {
    pub(crate) email: &'a str,
    pub(crate) name: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) bio: Option<&'a str>,
    pub(crate) subjects: Vec<String>,
}

fn require_school_admin(actor: Actor<'_>) -> Result<(), ServiceError> {
    match actor.role {
        UserRole::SchoolAdmin => Ok(()),
        UserRole::Admin | UserRole::Teacher | UserRole::Student => {
            Err(ServiceError::Unauthorized("Only school administrators can manage teachers"))
        }
    }
}

pub(crate) async fn add_teacher(
    pool: &PgPool,
    actor: Actor<'_>,
    teacher: NewTeacher<'_>,
) -> Result<TeacherListing, ServiceError> {
    require_school_admin(actor)?;
    let school_id = course_access::admin_school_id(pool, actor.id).await?;

    let now = primitive_now_utc();
    let mut tx = pool.begin().await?;
    let user = accounts::insert_user(
        &mut *tx,
        NewAccount {
            email: teacher.email,
            name: teacher.name,
            hashed_password: teacher.hashed_password,
            role: UserRole::Teacher,
        },
        now,
    )
    .await?;
    let profile = repositories::teacher_profiles::create(
        &mut *tx,
        CreateTeacherProfile {
            user_id: &user.id,
            school_id: Some(&school_id),
            bio: teacher.bio,
            subjects: teacher.subjects,
            created_at: now,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        actor_id = %actor.id,
        school_id = %school_id,
        teacher_id = %user.id,
        action = "school_add_teacher",
        "Teacher added to school"
    );

    Ok(TeacherListing {
        user_id: user.id,
        email: user.email,
        name: user.name,
        school_id: profile.school_id,
        bio: profile.bio,
        subjects: profile.subjects,
    })
}

pub(crate) async fn list_teachers(
    pool: &PgPool,
    actor: Actor<'_>,
) -> Result<Vec<TeacherListing>, ServiceError> {
    require_school_admin(actor)?;
    let school_id = course_access::admin_school_id(pool, actor.id).await?;
    Ok(repositories::teacher_profiles::list_by_school(pool, &school_id).await?)
}

pub(crate) async fn list_schools(pool: &PgPool) -> Result<Vec<School>, ServiceError> {
    Ok(repositories::schools::list(pool).await?)
}

pub(crate) async fn school_detail(
    pool: &PgPool,
    school_id: &str,
) -> Result<(School, Vec<TeacherListing>), ServiceError> {
    let school = repositories::schools::find_by_id(pool, school_id)
        .await?
        .ok_or(ServiceError::NotFound("School not found"))?;
    let teachers = repositories::teacher_profiles::list_by_school(pool, &school.id).await?;
    Ok((school, teachers))
}
