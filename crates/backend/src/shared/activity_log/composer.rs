use chrono::{DateTime, FixedOffset, Offset, Utc};
use contracts::shared::activity_log::{LogEntry, ACTION_RESULT_FAILURE, ACTION_RESULT_SUCCESS};

use super::{error_action_name, failure, UserRole, AUTH_NOT_LOGIN, FIELD_CONNECTOR, TIME_FORMAT_LOG_ID};
use crate::domain::identity::{AuthenticatedUser, CallerIdentity};
use crate::shared::config::ActivityLogConfig;
use crate::shared::http::{
    first_param_value, ParamMap, RequestContext, PARAM_COURSE_ID, PARAM_STUDENT_EMAIL,
};

// ============================================================================
// Public operations
// ============================================================================

/// Entry for a page action, with the message supplied by the action itself
pub fn compose_page_action_log(
    cfg: &ActivityLogConfig,
    ctx: &RequestContext,
    caller: &CallerIdentity,
    log_message: &str,
) -> LogEntry {
    compose(cfg, ctx, caller, log_message.to_string(), ACTION_RESULT_SUCCESS)
}

/// Entry for a failed action. The message is synthesized from the error and
/// the full parameter map; composition itself never fails.
pub fn compose_failure_log<E: std::error::Error>(
    cfg: &ActivityLogConfig,
    ctx: &RequestContext,
    err: &E,
    caller: &CallerIdentity,
) -> LogEntry {
    let action_name = action_name_for(&ctx.url);
    let message = failure::render_failure_message(&action_name, err, &ctx.params);
    compose(cfg, ctx, caller, message, ACTION_RESULT_FAILURE)
}

/// Entry carrying an arbitrary message, with default response status
pub fn compose_basic_log(
    cfg: &ActivityLogConfig,
    ctx: &RequestContext,
    message: &str,
    caller: &CallerIdentity,
) -> LogEntry {
    compose(cfg, ctx, caller, message.to_string(), ACTION_RESULT_SUCCESS)
}

// ============================================================================
// Composition
// ============================================================================

fn compose(
    cfg: &ActivityLogConfig,
    ctx: &RequestContext,
    caller: &CallerIdentity,
    log_message: String,
    action_response: &str,
) -> LogEntry {
    let action_name = action_name_for(&ctx.url);
    let time_tag = format_time_for_id(cfg, &ctx.timestamp);
    let automated = ctx.url.starts_with(&cfg.auto_page_prefix);

    let log_id: String;
    let mut role: UserRole;
    let mut google_id: String;

    if automated {
        log_id = [UserRole::Auto.label().as_str(), time_tag.as_str()].join(FIELD_CONNECTOR);
        role = UserRole::Auto;
        google_id = String::new();
    } else if let Some(user) = caller.login_user() {
        log_id = [user.id.as_str(), time_tag.as_str()].join(FIELD_CONNECTOR);
        google_id = user.id.clone();
        role = resolve_role(cfg, user, &action_name);
    } else {
        log_id = anonymous_log_id(&ctx.params, &time_tag);
        google_id = AUTH_NOT_LOGIN.to_string();
        role = UserRole::Unregistered { course: None };
    }

    let mut user_name = String::new();
    let mut user_email = String::new();
    let mut is_masquerade = false;

    match caller {
        CallerIdentity::UnregisteredStudent { student, .. } => {
            // Automated classification keeps its role even when an identity
            // overlay is present.
            if !automated {
                role = UserRole::Unregistered {
                    course: if student.course.is_empty() {
                        None
                    } else {
                        Some(student.course.clone())
                    },
                };
            }
            user_name = student.name.clone();
            user_email = student.email.clone();
        }
        CallerIdentity::Authenticated {
            user,
            account: Some(account),
        } => {
            if let Some(account_google_id) = &account.google_id {
                is_masquerade = user.id != *account_google_id;
                google_id = account_google_id.clone();
                user_name = account.name.clone();
                user_email = account.email.clone();
            }
        }
        _ => {}
    }

    LogEntry {
        log_id,
        action_name,
        url: ctx.url.clone(),
        timestamp: ctx.timestamp_millis(),
        user_role: role.label(),
        is_masquerade,
        user_google_id: google_id,
        user_name,
        user_email,
        log_message,
        action_response: action_response.to_string(),
    }
}

// ============================================================================
// Action name
// ============================================================================

fn action_name_for(url: &str) -> String {
    match extract_action_name(url) {
        Some(name) => name.to_string(),
        None => {
            tracing::warn!("Could not extract action name from url: {}", url);
            error_action_name(url)
        }
    }
}

/// Anchored scan equivalent to `^/\S+?/([^\s?]*)`: a leading slash, a
/// non-empty whitespace-free run up to the earliest further slash, then
/// everything until whitespace or `?`.
fn extract_action_name(url: &str) -> Option<&str> {
    let rest = url.strip_prefix('/')?;
    let mut boundary = None;
    for (i, ch) in rest.char_indices() {
        if ch == '/' && i > 0 {
            boundary = Some(i);
            break;
        }
        if ch.is_whitespace() {
            return None;
        }
    }
    let tail = &rest[boundary? + 1..];
    let end = tail
        .find(|c: char| c.is_whitespace() || c == '?')
        .unwrap_or(tail.len());
    Some(&tail[..end])
}

// ============================================================================
// Log id
// ============================================================================

fn anonymous_log_id(params: &ParamMap, time_tag: &str) -> String {
    let course_id = first_param_value(params, PARAM_COURSE_ID);
    let student_email = first_param_value(params, PARAM_STUDENT_EMAIL);
    match (course_id, student_email) {
        (Some(course_id), Some(student_email)) => {
            [student_email, course_id, time_tag].join(FIELD_CONNECTOR)
        }
        _ => [AUTH_NOT_LOGIN, time_tag].join(FIELD_CONNECTOR),
    }
}

/// Request time rendered in the fixed admin time zone, id-embeddable.
/// An out-of-range configured offset falls back to UTC.
fn format_time_for_id(cfg: &ActivityLogConfig, at: &DateTime<Utc>) -> String {
    let zone = FixedOffset::east_opt(cfg.admin_time_zone_offset_hours * 3600)
        .unwrap_or_else(|| Utc.fix());
    at.with_timezone(&zone).format(TIME_FORMAT_LOG_ID).to_string()
}

// ============================================================================
// Role resolution
// ============================================================================

fn resolve_role(cfg: &ActivityLogConfig, user: &AuthenticatedUser, action_name: &str) -> UserRole {
    if user.is_admin {
        let mut role = UserRole::Admin;
        // Both downgrade checks always run, in this order; a later match
        // overwrites an earlier one.
        if is_student_page(cfg, action_name) {
            role = UserRole::Student;
        }
        if is_instructor_page(cfg, action_name) {
            role = UserRole::Instructor;
        }
        role
    } else if user.is_instructor && user.is_student {
        if is_student_page(cfg, action_name) {
            UserRole::Student
        } else {
            UserRole::Instructor
        }
    } else if user.is_student {
        UserRole::Student
    } else if user.is_instructor {
        UserRole::Instructor
    } else {
        UserRole::Unregistered { course: None }
    }
}

fn is_student_page(cfg: &ActivityLogConfig, action_name: &str) -> bool {
    action_name
        .to_lowercase()
        .starts_with(&cfg.student_page_prefix)
}

fn is_instructor_page(cfg: &ActivityLogConfig, action_name: &str) -> bool {
    action_name
        .to_lowercase()
        .starts_with(&cfg.instructor_page_prefix)
        || cfg
            .instructor_stats_actions
            .iter()
            .any(|reserved| reserved == action_name)
}
