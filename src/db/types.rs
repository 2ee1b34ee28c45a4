use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "userrole", rename_all = "snake_case")]
pub(crate) enum UserRole {
    Admin,
    SchoolAdmin,
    Teacher,
    Student,
}

impl UserRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::SchoolAdmin => "school_admin",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }
}

/// Enrollment lifecycle status. `completed` and `dropped` are accepted from
/// storage but no operation here moves a row into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "enrollmentstatus", rename_all = "lowercase")]
pub(crate) enum EnrollmentStatus {
    Invited,
    Pending,
    Active,
    Completed,
    Dropped,
    Rejected,
}

impl EnrollmentStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Invited => "invited",
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
            EnrollmentStatus::Rejected => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_value(UserRole::SchoolAdmin).unwrap(), "school_admin");
        let parsed: UserRole = serde_json::from_value(serde_json::json!("teacher")).unwrap();
        assert_eq!(parsed, UserRole::Teacher);
        assert!(serde_json::from_value::<UserRole>(serde_json::json!("superuser")).is_err());
    }

    #[test]
    fn status_strings_match_serde() {
        for status in [
            EnrollmentStatus::Invited,
            EnrollmentStatus::Pending,
            EnrollmentStatus::Active,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Dropped,
            EnrollmentStatus::Rejected,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
    }
}
