//! Error types for the segment engine.
//!
//! Row-level ambiguity is never an error: it becomes an exclusion tag. The
//! variants here cover configuration loading, malformed values handed to the
//! time helpers, segment verification failures and review-state misuse.

use thiserror::Error;

/// The main error type for the segment engine.
///
/// # Example
///
/// ```
/// use segment_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A clock time was not a valid 24-hour `HH:MM` value.
    #[error("Invalid time '{value}': expected 24-hour HH:MM")]
    InvalidTime {
        /// The rejected input.
        value: String,
    },

    /// A work date could not be interpreted as a calendar date.
    #[error("Invalid work date '{value}'")]
    InvalidWorkDate {
        /// The rejected input.
        value: String,
    },

    /// Generated segments failed contiguity or duration verification.
    #[error("Segment mismatch for employee '{employee_id}': {message}")]
    SegmentMismatch {
        /// The employee whose segments failed verification.
        employee_id: String,
        /// What did not line up.
        message: String,
    },

    /// A review status change that is not one of the legal edges.
    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_time_displays_value() {
        let error = EngineError::InvalidTime {
            value: "25:00".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid time '25:00': expected 24-hour HH:MM");
    }

    #[test]
    fn test_segment_mismatch_displays_employee_and_message() {
        let error = EngineError::SegmentMismatch {
            employee_id: "2964".to_string(),
            message: "total 590 != worked 600".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Segment mismatch for employee '2964': total 590 != worked 600"
        );
    }

    #[test]
    fn test_invalid_transition_displays_states() {
        let error = EngineError::InvalidTransition {
            from: "completed".to_string(),
            to: "pending".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Illegal status transition: completed -> pending"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_time() -> EngineResult<()> {
            Err(EngineError::InvalidTime {
                value: "x".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_time()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
