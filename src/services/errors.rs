use thiserror::Error;

use crate::services::enrollment_lifecycle::TransitionError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Failure categories of the course and enrollment operations.
#[derive(Debug, Error)]
pub(crate) enum ServiceError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidArgument(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotInvited(_) => {
                ServiceError::InvalidState("Enrollment is not in invited status")
            }
            TransitionError::AlreadyDecided(_) => {
                ServiceError::InvalidState("Enrollment was already decided")
            }
        }
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_code(err, UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_code(err, FOREIGN_KEY_VIOLATION)
}

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}
