use axum::{extract::State, routing::put, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::user::{normalize_email, ProfileUpdate, UserResponse};
use crate::services::errors::is_unique_violation;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/me", put(update_me))
}

async fn update_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let updated = repositories::users::update_profile(
        state.db(),
        &user.id,
        repositories::users::UpdateProfile {
            name: payload.name.map(|name| name.trim().to_string()),
            email: payload.email.as_deref().map(normalize_email),
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Email already registered".to_string())
        } else {
            ApiError::internal(e, "Failed to update profile")
        }
    })?;

    Ok(Json(UserResponse::from_db(updated)))
}
