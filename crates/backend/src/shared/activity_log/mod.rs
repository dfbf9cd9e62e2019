//! Composition of activity-log entries for page actions.
//!
//! The entry is a pure function of the request snapshot, the caller identity
//! and the process configuration; writing it to a sink is someone else's job.

pub mod composer;
pub mod failure;

pub use composer::{compose_basic_log, compose_failure_log, compose_page_action_log};

/// Separator between parts of a composite log id. A `:` inside a field value
/// (an email local part, say) makes the id ambiguous; known constraint.
pub const FIELD_CONNECTOR: &str = ":";

/// Sentinel recorded in place of a google id for anonymous requests
pub const AUTH_NOT_LOGIN: &str = "not-logged-in";

/// Sortable fixed-width timestamp used inside log ids, in the admin time zone
pub const TIME_FORMAT_LOG_ID: &str = "%Y%m%d%H%M%S%3f";

/// Action-name placeholder for URLs the extraction pattern rejects
pub fn error_action_name(url: &str) -> String {
    format!("Error when getting ActionName for requestUrl : {}", url)
}

// ============================================================================
// User role
// ============================================================================

/// Role a request is attributed to in the activity log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Instructor,
    Student,
    /// Caller without a registered account; course is kept when known
    Unregistered { course: Option<String> },
    /// System-triggered automated action
    Auto,
}

impl UserRole {
    /// Label stored in the log entry
    pub fn label(&self) -> String {
        match self {
            Self::Admin => "admin".to_string(),
            Self::Instructor => "instructor".to_string(),
            Self::Student => "student".to_string(),
            Self::Unregistered { course: None } => "unregistered".to_string(),
            Self::Unregistered {
                course: Some(course),
            } => format!("unregistered{}{}", FIELD_CONNECTOR, course),
            Self::Auto => "auto".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(UserRole::Admin.label(), "admin");
        assert_eq!(UserRole::Instructor.label(), "instructor");
        assert_eq!(UserRole::Student.label(), "student");
        assert_eq!(UserRole::Auto.label(), "auto");
        assert_eq!(UserRole::Unregistered { course: None }.label(), "unregistered");
        assert_eq!(
            UserRole::Unregistered {
                course: Some("CS2103".to_string())
            }
            .label(),
            "unregistered:CS2103"
        );
    }

    #[test]
    fn test_error_action_name_embeds_url() {
        let placeholder = error_action_name("/malformed");
        assert!(placeholder.contains("/malformed"));
    }
}
