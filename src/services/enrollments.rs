use sqlx::{PgConnection, PgPool};
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Enrollment, EnrollmentWithCourse, EnrollmentWithStudent, LinkedStudent};
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::enrollments::CreateEnrollment;
use crate::services::course_access::{self, Actor};
use crate::services::enrollment_lifecycle::{self, EnrollmentOrigin, Transition};
use crate::services::errors::{is_unique_violation, ServiceError};
use crate::services::student_linkage;

const INVITE_CONFLICT: &str = "Student already enrolled or invited";
const REQUEST_CONFLICT: &str = "Already enrolled or access requested";

pub(crate) async fn invite_student(
    pool: &PgPool,
    actor: Actor<'_>,
    course_id: &str,
    student_email: &str,
) -> Result<Enrollment, ServiceError> {
    let course = repositories::courses::find_by_id(pool, course_id)
        .await?
        .ok_or(ServiceError::NotFound("Course not found"))?;

    course_access::authorize_course_manager(pool, actor, &course).await?;

    let student = repositories::users::find_by_email(pool, student_email.trim())
        .await?
        .ok_or(ServiceError::NotFound("Student not found"))?;
    if student.role != UserRole::Student {
        return Err(ServiceError::InvalidArgument("User is not a student"));
    }

    let now = primitive_now_utc();
    let mut tx = pool.begin().await?;
    let enrollment = insert_enrollment(
        &mut *tx,
        &student.id,
        &course.id,
        EnrollmentOrigin::Invitation,
        now,
        INVITE_CONFLICT,
    )
    .await?;
    let linkage =
        student_linkage::link_invited_student(&mut *tx, &student.id, &course, now).await?;
    tx.commit().await?;

    tracing::info!(
        actor_id = %actor.id,
        course_id = %course.id,
        student_id = %student.id,
        enrollment_id = %enrollment.id,
        linkage = ?linkage,
        action = "enrollment_invite",
        "Student invited"
    );
    metrics::counter!("enrollments_created_total", "origin" => "invitation").increment(1);

    Ok(enrollment)
}

pub(crate) async fn request_enrollment(
    pool: &PgPool,
    actor: Actor<'_>,
    course_id: &str,
) -> Result<Enrollment, ServiceError> {
    if actor.role != UserRole::Student {
        return Err(ServiceError::Unauthorized("Only students can request access to a course"));
    }

    let course = repositories::courses::find_by_id(pool, course_id)
        .await?
        .ok_or(ServiceError::NotFound("Course not found"))?;

    let now = primitive_now_utc();
    let mut tx = pool.begin().await?;
    let enrollment = insert_enrollment(
        &mut *tx,
        actor.id,
        &course.id,
        EnrollmentOrigin::AccessRequest,
        now,
        REQUEST_CONFLICT,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        actor_id = %actor.id,
        course_id = %course.id,
        enrollment_id = %enrollment.id,
        action = "enrollment_request",
        "Course access requested"
    );
    metrics::counter!("enrollments_created_total", "origin" => "request").increment(1);

    Ok(enrollment)
}

pub(crate) async fn respond_to_invitation(
    pool: &PgPool,
    actor: Actor<'_>,
    enrollment_id: &str,
    accept: bool,
) -> Result<Enrollment, ServiceError> {
    let enrollment = repositories::enrollments::find_for_student(pool, enrollment_id, actor.id)
        .await?
        .ok_or(ServiceError::NotFound("Invitation not found"))?;

    let transition = enrollment_lifecycle::respond_to_invitation(enrollment.status, accept)?;
    let updated = apply_transition(pool, &enrollment, transition).await?;

    tracing::info!(
        actor_id = %actor.id,
        enrollment_id = %updated.id,
        status = updated.status.as_str(),
        action = "enrollment_respond",
        "Invitation answered"
    );

    Ok(updated)
}

pub(crate) async fn decide_enrollment(
    pool: &PgPool,
    actor: Actor<'_>,
    enrollment_id: &str,
    approve: bool,
) -> Result<Enrollment, ServiceError> {
    if !course_access::is_course_manager_role(actor.role) {
        return Err(ServiceError::Unauthorized(
            "Only teachers and school administrators can manage enrollment requests",
        ));
    }

    let enrollment = repositories::enrollments::find_by_id(pool, enrollment_id)
        .await?
        .ok_or(ServiceError::NotFound("Enrollment not found"))?;
    let course = repositories::courses::find_by_id(pool, &enrollment.course_id)
        .await?
        .ok_or(ServiceError::NotFound("Course not found"))?;

    course_access::authorize_course_manager(pool, actor, &course).await?;

    let transition = enrollment_lifecycle::decide(enrollment.status, approve)?;
    let updated = apply_transition(pool, &enrollment, transition).await?;

    tracing::info!(
        actor_id = %actor.id,
        course_id = %course.id,
        enrollment_id = %updated.id,
        status = updated.status.as_str(),
        action = "enrollment_decide",
        "Enrollment decided"
    );

    Ok(updated)
}

pub(crate) async fn student_enrollments(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<EnrollmentWithCourse>, ServiceError> {
    Ok(repositories::enrollments::list_for_student(pool, student_id).await?)
}

pub(crate) async fn course_enrollments(
    pool: &PgPool,
    actor: Actor<'_>,
    course_id: &str,
) -> Result<Vec<EnrollmentWithStudent>, ServiceError> {
    let course = repositories::courses::find_by_id(pool, course_id)
        .await?
        .ok_or(ServiceError::NotFound("Course not found"))?;

    course_access::authorize_course_manager(pool, actor, &course).await?;

    Ok(repositories::enrollments::list_for_course(pool, &course.id).await?)
}

/// Students holding any enrollment in the caller's courses.
pub(crate) async fn linked_students(
    pool: &PgPool,
    actor: Actor<'_>,
) -> Result<Vec<LinkedStudent>, ServiceError> {
    let students = match actor.role {
        UserRole::Teacher => {
            repositories::students::list_enrolled_with_teacher(pool, actor.id).await?
        }
        UserRole::SchoolAdmin => {
            let school = repositories::schools::find_by_admin(pool, actor.id).await?;
            match school {
                Some(school) => {
                    repositories::students::list_enrolled_in_school(pool, &school.id).await?
                }
                None => Vec::new(),
            }
        }
        UserRole::Admin | UserRole::Student => Vec::new(),
    };
    Ok(students)
}

/// Existence check plus insert. Runs inside the caller's transaction; the
/// unique pair index settles races the check cannot see.
async fn insert_enrollment(
    conn: &mut PgConnection,
    student_id: &str,
    course_id: &str,
    origin: EnrollmentOrigin,
    now: PrimitiveDateTime,
    conflict: &'static str,
) -> Result<Enrollment, ServiceError> {
    if repositories::enrollments::find_for_pair(&mut *conn, student_id, course_id)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(conflict));
    }

    repositories::enrollments::create(
        &mut *conn,
        CreateEnrollment {
            id: &Uuid::new_v4().to_string(),
            student_user_id: student_id,
            course_id,
            status: enrollment_lifecycle::initial_status(origin),
            enrolled_at: now,
        },
    )
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            ServiceError::Conflict(conflict)
        } else {
            ServiceError::Database(err)
        }
    })
}

async fn apply_transition(
    pool: &PgPool,
    enrollment: &Enrollment,
    transition: Transition,
) -> Result<Enrollment, ServiceError> {
    let updated = repositories::enrollments::transition(
        pool,
        &enrollment.id,
        transition.from,
        transition.to,
        primitive_now_utc(),
    )
    .await?
    .ok_or(ServiceError::InvalidState("Enrollment was already decided"))?;

    metrics::counter!("enrollment_transitions_total", "to" => transition.to.as_str())
        .increment(1);

    Ok(updated)
}
