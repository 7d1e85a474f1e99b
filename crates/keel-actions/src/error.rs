//! Error types for actions, tasks, and copilot responses.

use keel_backend::BackendError;
use thiserror::Error;

/// A raw row could not be turned into a typed value.
///
/// Malformed rows are reported, never patched up with empty strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    /// `action_type` names no known action
    #[error("unknown action type '{0}'")]
    UnknownType(String),

    /// A required field is absent or null
    #[error("{action_type} action is missing required field '{field}'")]
    MissingField {
        /// Action type being parsed
        action_type: String,
        /// Field name
        field: &'static str,
    },

    /// A field is present but has the wrong shape
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Priority string not recognised
    #[error("unknown priority '{0}'")]
    UnknownPriority(String),

    /// Status string not recognised
    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    /// Timestamp not in RFC 3339 or `YYYY-MM-DD` form
    #[error("invalid timestamp for '{field}': '{value}'")]
    InvalidTimestamp {
        /// Field name
        field: &'static str,
        /// Raw value
        value: String,
    },
}

/// Errors raised by action operations.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Row parsing failed
    #[error(transparent)]
    Parse(#[from] ActionParseError),

    /// Remote call failed
    #[error("request failed: {0}")]
    Backend(#[from] BackendError),

    /// Copilot payload did not match any response type
    #[error("invalid copilot response: {0}")]
    Copilot(#[from] serde_json::Error),

    /// Invalid input
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for action operations.
pub type Result<T> = std::result::Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ActionParseError::MissingField {
            action_type: "email".to_string(),
            field: "subject",
        };
        assert_eq!(
            err.to_string(),
            "email action is missing required field 'subject'"
        );

        let err = ActionError::from(ActionParseError::UnknownType("fax".to_string()));
        assert_eq!(err.to_string(), "unknown action type 'fax'");
    }
}
