use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request parameter names consumed by activity logging
pub const PARAM_COURSE_ID: &str = "courseid";
pub const PARAM_STUDENT_EMAIL: &str = "studentemail";

/// Multi-valued request parameters, as handed over by the web framework.
/// Ordered map so that rendered parameter dumps are deterministic.
pub type ParamMap = BTreeMap<String, Vec<String>>;

/// Immutable snapshot of one incoming request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub url: String,
    pub params: ParamMap,
    pub timestamp: DateTime<Utc>,
}

impl RequestContext {
    /// Snapshot stamped with the current time
    pub fn new(url: impl Into<String>, params: ParamMap) -> Self {
        Self::at(url, params, Utc::now())
    }

    /// Snapshot with an explicit request time
    pub fn at(url: impl Into<String>, params: ParamMap, timestamp: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            params,
            timestamp,
        }
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// First value of a request parameter, if any was sent
pub fn first_param_value<'a>(params: &'a ParamMap, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}
