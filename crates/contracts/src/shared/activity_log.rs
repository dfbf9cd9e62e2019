use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Marker that opens every rendered activity-log line
pub const LOG_LINE_MARKER: &str = "FEEDBACKAPPLOG";

/// Delimiter between fields of a rendered activity-log line
pub const LOG_LINE_DELIMITER: &str = "|||";

/// Action outcome recorded when composition was not told otherwise
pub const ACTION_RESULT_SUCCESS: &str = "success";

/// Action outcome recorded for failed servlet-style actions
pub const ACTION_RESULT_FAILURE: &str = "failure";

// ============================================================================
// Log entry record
// ============================================================================

/// One activity-log record, frozen at composition time.
///
/// `action_name`, `url`, `timestamp`, `log_id` and `user_role` are always
/// populated; the remaining fields may be empty strings when the request
/// carried no matching information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub log_id: String,
    pub action_name: String,
    pub url: String,
    /// Epoch milliseconds of the request this entry describes
    pub timestamp: i64,
    pub user_role: String,
    /// Additive modifier: the session acted as an account other than its own.
    /// Never replaces `user_role`, only decorates its rendering.
    pub is_masquerade: bool,
    pub user_google_id: String,
    pub user_name: String,
    pub user_email: String,
    pub log_message: String,
    pub action_response: String,
}

impl LogEntry {
    /// Request time as a chrono timestamp
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Role label as shown to admins: `(M)` is appended in masquerade mode
    pub fn displayed_role(&self) -> String {
        if self.is_masquerade {
            format!("{}(M)", self.user_role)
        } else {
            self.user_role.clone()
        }
    }

    /// Renders the single persisted line for this entry
    pub fn to_log_line(&self) -> String {
        let displayed_role = self.displayed_role();
        [
            LOG_LINE_MARKER,
            self.action_name.as_str(),
            self.action_response.as_str(),
            displayed_role.as_str(),
            self.user_name.as_str(),
            self.user_google_id.as_str(),
            self.user_email.as_str(),
            self.log_message.as_str(),
            self.url.as_str(),
            self.log_id.as_str(),
        ]
        .join(LOG_LINE_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LogEntry {
        LogEntry {
            log_id: "gid:20260828120000000".to_string(),
            action_name: "instructorHomePage".to_string(),
            url: "/page/instructorHomePage".to_string(),
            timestamp: 1_700_000_000_000,
            user_role: "instructor".to_string(),
            is_masquerade: false,
            user_google_id: "gid".to_string(),
            user_name: "Ivan".to_string(),
            user_email: "ivan@example.com".to_string(),
            log_message: "Viewed home page".to_string(),
            action_response: ACTION_RESULT_SUCCESS.to_string(),
        }
    }

    #[test]
    fn test_log_line_field_order() {
        let entry = sample_entry();
        let line = entry.to_log_line();
        let fields: Vec<&str> = line.split(LOG_LINE_DELIMITER).collect();
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[0], LOG_LINE_MARKER);
        assert_eq!(fields[1], "instructorHomePage");
        assert_eq!(fields[2], "success");
        assert_eq!(fields[3], "instructor");
        assert_eq!(fields[9], "gid:20260828120000000");
    }

    #[test]
    fn test_masquerade_suffix_on_displayed_role_only() {
        let mut entry = sample_entry();
        entry.is_masquerade = true;
        assert_eq!(entry.user_role, "instructor");
        assert_eq!(entry.displayed_role(), "instructor(M)");
        assert!(entry.to_log_line().contains("|||instructor(M)|||"));
    }

    #[test]
    fn test_occurred_at_round_trip() {
        let entry = sample_entry();
        let at = entry.occurred_at().unwrap();
        assert_eq!(at.timestamp_millis(), entry.timestamp);
    }

    #[test]
    fn test_serde_round_trip() {
        let entry = sample_entry();
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
