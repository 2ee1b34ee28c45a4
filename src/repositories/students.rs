use sqlx::PgPool;

use crate::db::models::{LinkedStudent, StudentProfile};

const COLUMNS: &str =
    "user_id, parent_name, grade_level, school_id, teacher_id, created_at, updated_at";

/// Reads the profile and locks it for the rest of the transaction.
pub(crate) async fn find_for_update(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
) -> Result<Option<StudentProfile>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "SELECT {COLUMNS} FROM students WHERE user_id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_by_user_id(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<StudentProfile>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "SELECT {COLUMNS} FROM students WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateStudent<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) school_id: Option<&'a str>,
    pub(crate) teacher_id: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

/// Inserts a profile. If a concurrent writer created it first, only its null
/// association fields are filled.
pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateStudent<'_>,
) -> Result<StudentProfile, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "INSERT INTO students (user_id, school_id, teacher_id, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$4)
         ON CONFLICT (user_id) DO UPDATE SET
            school_id = COALESCE(students.school_id, EXCLUDED.school_id),
            teacher_id = COALESCE(students.teacher_id, EXCLUDED.teacher_id),
            updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.school_id)
    .bind(params.teacher_id)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) struct FillAssociation<'a> {
    pub(crate) school_id: Option<&'a str>,
    pub(crate) teacher_id: Option<&'a str>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

/// Sets association fields that are still null; populated fields are kept.
pub(crate) async fn fill_association(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    params: FillAssociation<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE students SET
            school_id = COALESCE(school_id, $1),
            teacher_id = COALESCE(teacher_id, $2),
            updated_at = $3
         WHERE user_id = $4",
    )
    .bind(params.school_id)
    .bind(params.teacher_id)
    .bind(params.updated_at)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(())
}

const LINKED_COLUMNS: &str =
    "u.id AS user_id, u.email, u.name, s.grade_level, s.school_id, s.teacher_id";

pub(crate) async fn list_enrolled_with_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<LinkedStudent>, sqlx::Error> {
    sqlx::query_as::<_, LinkedStudent>(&format!(
        "SELECT DISTINCT {LINKED_COLUMNS}
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         JOIN users u ON u.id = e.student_user_id
         LEFT JOIN students s ON s.user_id = u.id
         WHERE c.teacher_id = $1
         ORDER BY u.name ASC"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_enrolled_in_school(
    pool: &PgPool,
    school_id: &str,
) -> Result<Vec<LinkedStudent>, sqlx::Error> {
    sqlx::query_as::<_, LinkedStudent>(&format!(
        "SELECT DISTINCT {LINKED_COLUMNS}
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         JOIN users u ON u.id = e.student_user_id
         LEFT JOIN students s ON s.user_id = u.id
         WHERE c.school_id = $1
         ORDER BY u.name ASC"
    ))
    .bind(school_id)
    .fetch_all(pool)
    .await
}
