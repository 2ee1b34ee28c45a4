use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::{
    Course, CourseListing, Enrollment, EnrollmentWithCourse, EnrollmentWithStudent, Schedule,
};
use crate::db::types::EnrollmentStatus;

const COLUMNS: &str = "id, student_user_id, course_id, status, enrolled_at, decided_at";

pub(crate) struct CreateEnrollment<'a> {
    pub(crate) id: &'a str,
    pub(crate) student_user_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) status: EnrollmentStatus,
    pub(crate) enrolled_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateEnrollment<'_>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (id, student_user_id, course_id, status, enrolled_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.student_user_id)
    .bind(params.course_id)
    .bind(params.status)
    .bind(params.enrolled_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    enrollment_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1"))
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_for_student(
    pool: &PgPool,
    enrollment_id: &str,
    student_user_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE id = $1 AND student_user_id = $2"
    ))
    .bind(enrollment_id)
    .bind(student_user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_for_pair(
    executor: impl sqlx::PgExecutor<'_>,
    student_user_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE student_user_id = $1 AND course_id = $2"
    ))
    .bind(student_user_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

/// Moves the row to `to` only while it is still in `from`. Returns `None` when
/// the row is gone or its status changed in between.
pub(crate) async fn transition(
    pool: &PgPool,
    enrollment_id: &str,
    from: EnrollmentStatus,
    to: EnrollmentStatus,
    decided_at: PrimitiveDateTime,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "UPDATE enrollments SET status = $1, decided_at = $2
         WHERE id = $3 AND status = $4
         RETURNING {COLUMNS}",
    ))
    .bind(to)
    .bind(decided_at)
    .bind(enrollment_id)
    .bind(from)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<EnrollmentWithStudent>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentWithStudent>(
        "SELECT e.id, e.student_user_id, e.course_id, e.status, e.enrolled_at, e.decided_at,
                u.name AS student_name, u.email AS student_email
         FROM enrollments e
         JOIN users u ON u.id = e.student_user_id
         WHERE e.course_id = $1
         ORDER BY e.enrolled_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

#[derive(FromRow)]
struct EnrollmentCourseRow {
    id: String,
    student_user_id: String,
    course_id: String,
    status: EnrollmentStatus,
    enrolled_at: PrimitiveDateTime,
    decided_at: Option<PrimitiveDateTime>,
    course_title: String,
    course_description: String,
    course_schedule: Option<Json<Schedule>>,
    course_school_id: Option<String>,
    course_teacher_id: Option<String>,
    course_price: f64,
    course_created_at: PrimitiveDateTime,
    course_updated_at: PrimitiveDateTime,
    teacher_name: Option<String>,
    teacher_email: Option<String>,
    school_name: Option<String>,
}

impl From<EnrollmentCourseRow> for EnrollmentWithCourse {
    fn from(row: EnrollmentCourseRow) -> Self {
        let course = Course {
            id: row.course_id.clone(),
            title: row.course_title,
            description: row.course_description,
            schedule: row.course_schedule,
            school_id: row.course_school_id,
            teacher_id: row.course_teacher_id,
            price: row.course_price,
            created_at: row.course_created_at,
            updated_at: row.course_updated_at,
        };
        Self {
            enrollment: Enrollment {
                id: row.id,
                student_user_id: row.student_user_id,
                course_id: row.course_id,
                status: row.status,
                enrolled_at: row.enrolled_at,
                decided_at: row.decided_at,
            },
            course: CourseListing {
                course,
                teacher_name: row.teacher_name,
                teacher_email: row.teacher_email,
                school_name: row.school_name,
            },
        }
    }
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_user_id: &str,
) -> Result<Vec<EnrollmentWithCourse>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EnrollmentCourseRow>(
        "SELECT e.id, e.student_user_id, e.course_id, e.status, e.enrolled_at, e.decided_at,
                c.title AS course_title, c.description AS course_description,
                c.schedule AS course_schedule, c.school_id AS course_school_id,
                c.teacher_id AS course_teacher_id, c.price AS course_price,
                c.created_at AS course_created_at, c.updated_at AS course_updated_at,
                t.name AS teacher_name, t.email AS teacher_email, s.name AS school_name
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         LEFT JOIN users t ON t.id = c.teacher_id
         LEFT JOIN schools s ON s.id = c.school_id
         WHERE e.student_user_id = $1
         ORDER BY e.enrolled_at DESC",
    )
    .bind(student_user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(EnrollmentWithCourse::from).collect())
}
