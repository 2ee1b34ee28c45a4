//! Enrollment state machine.
//!
//! ```text
//! invite  -> invited --accept--> active | --decline--> rejected
//! request -> pending --approve-> active | --reject---> rejected
//! ```
//!
//! Every row leaves its initial state at most once. Invitations are answered
//! by the student. Whoever manages the course may decide any row that has not
//! left its initial state, invitations included.

use thiserror::Error;

use crate::db::types::EnrollmentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnrollmentOrigin {
    Invitation,
    AccessRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum TransitionError {
    #[error("enrollment is {0:?} but must be invited")]
    NotInvited(EnrollmentStatus),
    #[error("enrollment is {0:?} and was already decided")]
    AlreadyDecided(EnrollmentStatus),
}

/// A validated move between two statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) from: EnrollmentStatus,
    pub(crate) to: EnrollmentStatus,
}

pub(crate) fn initial_status(origin: EnrollmentOrigin) -> EnrollmentStatus {
    match origin {
        EnrollmentOrigin::Invitation => EnrollmentStatus::Invited,
        EnrollmentOrigin::AccessRequest => EnrollmentStatus::Pending,
    }
}

fn outcome(accepted: bool) -> EnrollmentStatus {
    if accepted {
        EnrollmentStatus::Active
    } else {
        EnrollmentStatus::Rejected
    }
}

pub(crate) fn respond_to_invitation(
    current: EnrollmentStatus,
    accept: bool,
) -> Result<Transition, TransitionError> {
    match current {
        EnrollmentStatus::Invited => Ok(Transition { from: current, to: outcome(accept) }),
        other => Err(TransitionError::NotInvited(other)),
    }
}

pub(crate) fn decide(
    current: EnrollmentStatus,
    approve: bool,
) -> Result<Transition, TransitionError> {
    match current {
        EnrollmentStatus::Invited | EnrollmentStatus::Pending => {
            Ok(Transition { from: current, to: outcome(approve) })
        }
        other => Err(TransitionError::AlreadyDecided(other)),
    }
}
