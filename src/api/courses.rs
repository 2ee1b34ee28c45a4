use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStudent, CurrentUser};
use crate::core::state::AppState;
use crate::schemas::course::{CourseCreate, CourseResponse, InviteRequest};
use crate::schemas::enrollment::{CourseEnrollmentResponse, EnrollmentResponse};
use crate::services::course_access::Actor;
use crate::services::courses::{self, NewCourse};
use crate::services::enrollments;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id/invite", post(invite_student))
        .route("/:course_id/request-access", post(request_access))
        .route("/:course_id/enrollments", get(course_enrollments))
}

async fn create_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = courses::create_course(
        state.db(),
        Actor::from(&user),
        NewCourse {
            title: &payload.title,
            description: payload.description.trim(),
            schedule: payload.schedule,
            price: payload.price,
            teacher_id: payload.teacher_id.as_deref(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn list_courses(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let listings = courses::list_courses(state.db(), Actor::from(&user)).await?;
    Ok(Json(listings.into_iter().map(CourseResponse::from_listing).collect()))
}

async fn invite_student(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<InviteRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let enrollment =
        enrollments::invite_student(state.db(), Actor::from(&user), &course_id, &payload.email)
            .await?;

    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_db(enrollment))))
}

async fn request_access(
    Path(course_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let enrollment =
        enrollments::request_enrollment(state.db(), Actor::from(&student), &course_id).await?;

    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_db(enrollment))))
}

async fn course_enrollments(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseEnrollmentResponse>>, ApiError> {
    let rows = enrollments::course_enrollments(state.db(), Actor::from(&user), &course_id).await?;
    Ok(Json(rows.into_iter().map(CourseEnrollmentResponse::from_db).collect()))
}

#[cfg(test)]
mod tests;
