use std::any::type_name;
use std::error::Error;

use crate::shared::http::ParamMap;

/// Failure description embedded in the log entry. Total: it never panics,
/// including for errors with empty messages and no sources.
pub fn render_failure_message<E: Error>(action_name: &str, err: &E, params: &ParamMap) -> String {
    format!(
        "Action failure in {}. {}: {}. Request parameters: {}",
        action_name,
        error_category::<E>(),
        render_error_chain(err),
        render_params(params),
    )
}

/// Category of the error, the closest analogue of an exception class name
pub fn error_category<E: Error>() -> &'static str {
    type_name::<E>()
}

/// The error's display message followed by its full source chain
pub fn render_error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str("; caused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// Parameter map as JSON; degrades to an empty object on serialization failure
pub fn render_params(params: &ParamMap) -> String {
    serde_json::to_string(params).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct SilentError;

    impl fmt::Display for SilentError {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    impl Error for SilentError {}

    #[derive(Debug)]
    struct OuterError {
        inner: SilentError,
    }

    impl fmt::Display for OuterError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failed")
        }
    }

    impl Error for OuterError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.inner)
        }
    }

    #[test]
    fn test_chain_includes_all_sources() {
        let err = OuterError { inner: SilentError };
        assert_eq!(render_error_chain(&err), "outer failed; caused by: ");
    }

    #[test]
    fn test_messageless_error_degrades_to_category() {
        let params = ParamMap::new();
        let message = render_failure_message("somePage", &SilentError, &params);
        assert!(message.contains("SilentError"));
        assert!(message.contains("somePage"));
    }

    #[test]
    fn test_params_rendered_as_json() {
        let mut params = ParamMap::new();
        params.insert("courseid".to_string(), vec!["CS2103".to_string()]);
        let rendered = render_params(&params);
        assert_eq!(rendered, r#"{"courseid":["CS2103"]}"#);
    }
}
