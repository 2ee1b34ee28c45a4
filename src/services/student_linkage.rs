use sqlx::PgConnection;
use time::PrimitiveDateTime;

use crate::db::models::{Course, StudentProfile};
use crate::repositories;
use crate::repositories::students::{CreateStudent, FillAssociation};

/// What an invitation does to the invitee's primary school and teacher.
/// The first non-null value wins and is never replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LinkagePlan {
    Create { school_id: Option<String>, teacher_id: Option<String> },
    Fill { school_id: Option<String>, teacher_id: Option<String> },
    Unchanged,
}

pub(crate) fn plan(existing: Option<&StudentProfile>, course: &Course) -> LinkagePlan {
    let Some(profile) = existing else {
        return LinkagePlan::Create {
            school_id: course.school_id.clone(),
            teacher_id: course.teacher_id.clone(),
        };
    };

    let school_id = match profile.school_id {
        None => course.school_id.clone(),
        Some(_) => None,
    };
    let teacher_id = match profile.teacher_id {
        None => course.teacher_id.clone(),
        Some(_) => None,
    };

    if school_id.is_none() && teacher_id.is_none() {
        LinkagePlan::Unchanged
    } else {
        LinkagePlan::Fill { school_id, teacher_id }
    }
}

/// Applies the linkage for an invited student inside the caller's transaction.
pub(crate) async fn link_invited_student(
    conn: &mut PgConnection,
    student_user_id: &str,
    course: &Course,
    now: PrimitiveDateTime,
) -> Result<LinkagePlan, sqlx::Error> {
    let existing = repositories::students::find_for_update(&mut *conn, student_user_id).await?;
    let plan = plan(existing.as_ref(), course);

    match &plan {
        LinkagePlan::Create { school_id, teacher_id } => {
            repositories::students::create(
                &mut *conn,
                CreateStudent {
                    user_id: student_user_id,
                    school_id: school_id.as_deref(),
                    teacher_id: teacher_id.as_deref(),
                    created_at: now,
                },
            )
            .await?;
        }
        LinkagePlan::Fill { school_id, teacher_id } => {
            repositories::students::fill_association(
                &mut *conn,
                student_user_id,
                FillAssociation {
                    school_id: school_id.as_deref(),
                    teacher_id: teacher_id.as_deref(),
                    updated_at: now,
                },
            )
            .await?;
        }
        LinkagePlan::Unchanged => {}
    }

    Ok(plan)
}
