use sqlx::types::Json;

use crate::db::models::{TeacherListing, TeacherProfile};

const COLUMNS: &str = "user_id, school_id, bio, subjects, created_at, updated_at";

pub(crate) struct CreateTeacherProfile<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) school_id: Option<&'a str>,
    pub(crate) bio: Option<&'a str>,
    pub(crate) subjects: Vec<String>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateTeacherProfile<'_>,
) -> Result<TeacherProfile, sqlx::Error> {
    sqlx::query_as::<_, TeacherProfile>(&format!(
        "INSERT INTO teacher_profiles (user_id, school_id, bio, subjects, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.school_id)
    .bind(params.bio)
    .bind(Json(params.subjects))
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

/// Creates an empty independent profile unless one exists already.
pub(crate) async fn ensure_exists(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO teacher_profiles (user_id, subjects, created_at, updated_at)
         VALUES ($1, '[]'::jsonb, $2, $2)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn list_by_school(
    executor: impl sqlx::PgExecutor<'_>,
    school_id: &str,
) -> Result<Vec<TeacherListing>, sqlx::Error> {
    sqlx::query_as::<_, TeacherListing>(
        "SELECT tp.user_id, u.email, u.name, tp.school_id, tp.bio, tp.subjects
         FROM teacher_profiles tp
         JOIN users u ON u.id = tp.user_id
         WHERE tp.school_id = $1
         ORDER BY u.name ASC",
    )
    .bind(school_id)
    .fetch_all(executor)
    .await
}
