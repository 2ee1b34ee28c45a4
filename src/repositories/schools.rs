use sqlx::PgPool;

use crate::db::models::School;

const COLUMNS: &str = "\
    id, admin_user_id, name, city, address, phone, is_verified, \
    rating_avg, rating_count, created_at, updated_at";

pub(crate) struct CreateSchool<'a> {
    pub(crate) id: &'a str,
    pub(crate) admin_user_id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateSchool<'_>,
) -> Result<School, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "INSERT INTO schools (id, admin_user_id, name, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$4)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.admin_user_id)
    .bind(params.name)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!("SELECT {COLUMNS} FROM schools WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_admin(
    executor: impl sqlx::PgExecutor<'_>,
    admin_user_id: &str,
) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!("SELECT {COLUMNS} FROM schools WHERE admin_user_id = $1"))
        .bind(admin_user_id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "SELECT {COLUMNS} FROM schools ORDER BY rating_avg DESC, name ASC"
    ))
    .fetch_all(pool)
    .await
}
