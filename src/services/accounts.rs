use sqlx::{PgConnection, PgPool};
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::schools::CreateSchool;
use crate::repositories::students::CreateStudent;
use crate::repositories::users::CreateUser;
use crate::services::errors::{is_unique_violation, ServiceError};

pub(crate) const DEFAULT_SCHOOL_NAME: &str = "My School";

pub(crate) struct NewAccount<'a> {
    pub(crate) email: &'a str,
    pub(crate) name: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
}

/// Creates a user together with the record its role needs: a school for a
/// school admin, an independent profile for a teacher, an empty profile for a
/// student.
pub(crate) async fn register(pool: &PgPool, account: NewAccount<'_>) -> Result<User, ServiceError> {
    if account.role == UserRole::Admin {
        return Err(ServiceError::InvalidArgument(
            "Administrator accounts cannot be self-registered",
        ));
    }

    let now = primitive_now_utc();
    let mut tx = pool.begin().await?;
    let user = insert_user(&mut *tx, account, now).await?;
    provision_role_records(&mut *tx, &user, now).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user.id,
        role = user.role.as_str(),
        action = "register",
        "User registered"
    );
    Ok(user)
}

pub(crate) async fn insert_user(
    conn: &mut PgConnection,
    account: NewAccount<'_>,
    now: PrimitiveDateTime,
) -> Result<User, ServiceError> {
    repositories::users::create(
        &mut *conn,
        CreateUser {
            id: &Uuid::new_v4().to_string(),
            email: account.email,
            name: account.name,
            hashed_password: account.hashed_password,
            role: account.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            ServiceError::Conflict("Email already registered")
        } else {
            ServiceError::Database(err)
        }
    })
}

async fn provision_role_records(
    conn: &mut PgConnection,
    user: &User,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    match user.role {
        UserRole::SchoolAdmin => {
            repositories::schools::create(
                &mut *conn,
                CreateSchool {
                    id: &Uuid::new_v4().to_string(),
                    admin_user_id: &user.id,
                    name: DEFAULT_SCHOOL_NAME,
                    created_at: now,
                },
            )
            .await?;
        }
        UserRole::Teacher => {
            repositories::teacher_profiles::ensure_exists(&mut *conn, &user.id, now).await?;
        }
        UserRole::Student => {
            repositories::students::create(
                &mut *conn,
                CreateStudent {
                    user_id: &user.id,
                    school_id: None,
                    teacher_id: None,
                    created_at: now,
                },
            )
            .await?;
        }
        UserRole::Admin => {}
    }
    Ok(())
}
