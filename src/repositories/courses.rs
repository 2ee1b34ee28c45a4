use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::{Course, CourseListing, Schedule};

const COLUMNS: &str =
    "id, title, description, schedule, school_id, teacher_id, price, created_at, updated_at";

const LISTING_COLUMNS: &str = "\
    c.id, c.title, c.description, c.schedule, c.school_id, c.teacher_id, c.price, \
    c.created_at, c.updated_at, \
    t.name AS teacher_name, t.email AS teacher_email, s.name AS school_name";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) schedule: Option<Schedule>,
    pub(crate) school_id: Option<&'a str>,
    pub(crate) teacher_id: Option<&'a str>,
    pub(crate) price: f64,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateCourse<'_>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, title, description, schedule, school_id, teacher_id, price, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$8)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.schedule.map(Json))
    .bind(params.school_id)
    .bind(params.teacher_id)
    .bind(params.price)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(executor)
        .await
}

/// Which courses a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CourseFilter<'a> {
    All,
    Teacher(&'a str),
    School(&'a str),
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: CourseFilter<'_>,
) -> Result<Vec<CourseListing>, sqlx::Error> {
    let base = format!(
        "SELECT {LISTING_COLUMNS}
         FROM courses c
         LEFT JOIN users t ON t.id = c.teacher_id
         LEFT JOIN schools s ON s.id = c.school_id"
    );

    match filter {
        CourseFilter::All => {
            sqlx::query_as::<_, CourseListing>(&format!("{base} ORDER BY c.created_at DESC"))
                .fetch_all(pool)
                .await
        }
        CourseFilter::Teacher(teacher_id) => {
            sqlx::query_as::<_, CourseListing>(&format!(
                "{base} WHERE c.teacher_id = $1 ORDER BY c.created_at DESC"
            ))
            .bind(teacher_id)
            .fetch_all(pool)
            .await
        }
        CourseFilter::School(school_id) => {
            sqlx::query_as::<_, CourseListing>(&format!(
                "{base} WHERE c.school_id = $1 ORDER BY c.created_at DESC"
            ))
            .bind(school_id)
            .fetch_all(pool)
            .await
        }
    }
}
