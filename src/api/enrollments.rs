use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStudent, CurrentUser};
use crate::core::state::AppState;
use crate::schemas::enrollment::{
    EnrollmentDecision, EnrollmentResponse, InvitationAnswer, LinkedStudentResponse,
    StudentEnrollmentResponse,
};
use crate::services::course_access::Actor;
use crate::services::enrollments;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/enrollments/me", get(my_enrollments))
        .route("/enrollments/:enrollment_id/decision", post(decide))
        .route("/invitations/:enrollment_id/respond", post(respond))
        .route("/students/mine", get(my_students))
}

async fn my_enrollments(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentEnrollmentResponse>>, ApiError> {
    let rows = enrollments::student_enrollments(state.db(), &student.id).await?;
    Ok(Json(rows.into_iter().map(StudentEnrollmentResponse::from_db).collect()))
}

async fn respond(
    Path(enrollment_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<InvitationAnswer>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = enrollments::respond_to_invitation(
        state.db(),
        Actor::from(&student),
        &enrollment_id,
        payload.accept,
    )
    .await?;

    Ok(Json(EnrollmentResponse::from_db(enrollment)))
}

async fn decide(
    Path(enrollment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentDecision>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = enrollments::decide_enrollment(
        state.db(),
        Actor::from(&user),
        &enrollment_id,
        payload.approve,
    )
    .await?;

    Ok(Json(EnrollmentResponse::from_db(enrollment)))
}

async fn my_students(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkedStudentResponse>>, ApiError> {
    let students = enrollments::linked_students(state.db(), Actor::from(&user)).await?;
    Ok(Json(students.into_iter().map(LinkedStudentResponse::from_db).collect()))
}
