use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::security;
use crate::core::state::AppState;
use crate::schemas::school::{
    SchoolDetailResponse, SchoolResponse, TeacherCreate, TeacherResponse,
};
use crate::schemas::user::normalize_email;
use crate::services::course_access::Actor;
use crate::services::schools::{self, NewTeacher};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schools))
        .route("/teachers", get(list_teachers).post(add_teacher))
        .route("/:school_id", get(get_school))
}

async fn list_schools(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SchoolResponse>>, ApiError> {
    let schools = schools::list_schools(state.db()).await?;
    Ok(Json(schools.into_iter().map(SchoolResponse::from_db).collect()))
}

async fn get_school(
    Path(school_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SchoolDetailResponse>, ApiError> {
    let (school, teachers) = schools::school_detail(state.db(), &school_id).await?;
    Ok(Json(SchoolDetailResponse {
        school: SchoolResponse::from_db(school),
        teachers: teachers.into_iter().map(TeacherResponse::from_db).collect(),
    }))
}

async fn list_teachers(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherResponse>>, ApiError> {
    let teachers = schools::list_teachers(state.db(), Actor::from(&user)).await?;
    Ok(Json(teachers.into_iter().map(TeacherResponse::from_db).collect()))
}

async fn add_teacher(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<TeacherCreate>,
) -> Result<(StatusCode, Json<TeacherResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;
    let email = normalize_email(&payload.email);
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let subjects = payload
        .subjects
        .iter()
        .map(|subject| subject.trim())
        .filter(|subject| !subject.is_empty())
        .map(str::to_string)
        .collect();

    let teacher = schools::add_teacher(
        state.db(),
        Actor::from(&user),
        NewTeacher {
            email: &email,
            name,
            hashed_password,
            bio: payload.bio.as_deref(),
            subjects,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TeacherResponse::from_db(teacher))))
}
