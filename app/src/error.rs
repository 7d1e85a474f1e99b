//! Error types for shell commands.

use keel_actions::{ActionError, ActionParseError};
use keel_backend::BackendError;
use keel_core::{ConfigError, KeelError};
use keel_interaction::ConfirmError;
use keel_prospect::{ProspectError, INTEGRATIONS_SETTINGS_PATH};
use serde::Serialize;

/// Serializable error returned by every command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandError {
    /// Error code for frontend handling (e.g., "NOT_CONFIGURED")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional debugging context (never contains tokens or keys)
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

/// Prospecting failures. Missing provider credentials get their own code so
/// the frontend can link to the integrations page; every other remote
/// failure collapses to `SEARCH_FAILED`.
impl From<ProspectError> for CommandError {
    fn from(err: ProspectError) -> Self {
        match err {
            ProspectError::NotConfigured { provider, message } => Self::with_details(
                "NOT_CONFIGURED",
                format!(
                    "{} is not configured. Add your API key in Settings > Integrations.",
                    provider.display_name()
                ),
                serde_json::json!({
                    "provider": provider.slug(),
                    "settings_path": INTEGRATIONS_SETTINGS_PATH,
                    "server_message": message,
                }),
            ),
            ProspectError::Backend(_) | ProspectError::Decode(_) => {
                tracing::warn!("Prospecting request failed: {}", err);
                Self::new("SEARCH_FAILED", "Search failed. Please try again.")
            }
            ProspectError::Unsupported {
                provider,
                operation,
            } => Self::new(
                "UNSUPPORTED",
                format!("{} does not support {operation}", provider.display_name()),
            ),
            ProspectError::EmptyFilters => {
                Self::new("EMPTY_FILTERS", "Add at least one filter to search")
            }
            ProspectError::InvalidRange { field, min, max } => Self::with_details(
                "INVALID_RANGE",
                format!("Invalid range for {field}"),
                serde_json::json!({ "field": field, "min": min, "max": max }),
            ),
            ProspectError::EmptySelection => {
                Self::new("EMPTY_SELECTION", "Select at least one result to import")
            }
            ProspectError::InvalidSeedDomains(msg) => Self::new("INVALID_SEED_DOMAINS", msg),
            ProspectError::InvalidTransition { from, action } => Self::with_details(
                "INVALID_TRANSITION",
                format!("Cannot {action} from the {} step", from.label()),
                serde_json::json!({ "step": from.step_number() }),
            ),
            ProspectError::NothingMore => Self::new("NOTHING_MORE", "All results are loaded"),
            ProspectError::InsufficientCredits { balance, estimate } => Self::with_details(
                "INSUFFICIENT_CREDITS",
                "Not enough credits for this search",
                serde_json::json!({ "balance": balance, "estimate": estimate }),
            ),
            ProspectError::Busy => Self::new("BUSY", "Another request is in progress"),
            ProspectError::Closed => Self::new("CLOSED", "The wizard was closed"),
            ProspectError::QueryChanged => {
                Self::new("QUERY_CHANGED", "Filters changed. Run the search again.")
            }
            ProspectError::Validation(msg) => Self::new("VALIDATION_ERROR", msg),
        }
    }
}

impl From<ActionError> for CommandError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Parse(parse) => parse.into(),
            ActionError::Backend(err) => err.into(),
            ActionError::Copilot(err) => {
                Self::new("INVALID_COPILOT_RESPONSE", format!("Invalid copilot response: {err}"))
            }
            ActionError::Validation(msg) => Self::new("VALIDATION_ERROR", msg),
        }
    }
}

impl From<ActionParseError> for CommandError {
    fn from(err: ActionParseError) -> Self {
        Self::new("INVALID_ACTION", err.to_string())
    }
}

impl From<BackendError> for CommandError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Api { status, .. } if status == 401 || status == 403 => {
                Self::new("UNAUTHORIZED", "Your session has expired. Please sign in again.")
            }
            BackendError::Session(msg) => Self::new("NOT_SIGNED_IN", msg),
            other => {
                tracing::warn!("Backend request failed: {}", other);
                Self::new("REQUEST_FAILED", "Request failed. Please try again.")
            }
        }
    }
}

impl From<KeelError> for CommandError {
    fn from(err: KeelError) -> Self {
        match err {
            KeelError::Config(err) => err.into(),
            KeelError::Session(msg) => Self::new("NOT_SIGNED_IN", msg),
            KeelError::Validation(msg) => Self::new("VALIDATION_ERROR", msg),
            other => Self::new("INTERNAL_ERROR", other.to_string()),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", format!("Configuration error: {err}"))
    }
}

/// A typed-name mismatch never reaches the backend; action failures keep
/// their own code.
impl From<ConfirmError<CommandError>> for CommandError {
    fn from(err: ConfirmError<CommandError>) -> Self {
        match err {
            ConfirmError::Mismatch => Self::new(
                "CONFIRMATION_MISMATCH",
                "Type the organization name exactly to confirm",
            ),
            ConfirmError::Failed(err) => err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_prospect::Provider;

    #[test]
    fn test_command_error_new() {
        let err = CommandError::new("TEST_CODE", "Test message");
        assert_eq!(err.code, "TEST_CODE");
        assert_eq!(err.message, "Test message");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_not_configured_links_to_settings() {
        let err: CommandError = ProspectError::NotConfigured {
            provider: Provider::AiArk,
            message: "missing api key".to_string(),
        }
        .into();
        assert_eq!(err.code, "NOT_CONFIGURED");
        assert!(err.message.contains("Settings > Integrations"));
        let details = err.details.unwrap();
        assert_eq!(details["settings_path"], "/settings/integrations");
    }

    #[test]
    fn test_remote_failures_are_generic() {
        let err: CommandError = ProspectError::Backend(BackendError::Api {
            status: 500,
            code: None,
            message: "upstream exploded".to_string(),
        })
        .into();
        assert_eq!(err.code, "SEARCH_FAILED");
        assert_eq!(err.message, "Search failed. Please try again.");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_backend_unauthorized() {
        let err: CommandError = BackendError::Api {
            status: 401,
            code: None,
            message: "JWT expired".to_string(),
        }
        .into();
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    #[test]
    fn test_confirm_mismatch() {
        let err: CommandError = ConfirmError::<CommandError>::Mismatch.into();
        assert_eq!(err.code, "CONFIRMATION_MISMATCH");

        let inner = CommandError::new("REQUEST_FAILED", "nope");
        let err: CommandError = ConfirmError::Failed(inner.clone()).into();
        assert_eq!(err, inner);
    }

    #[test]
    fn test_serializes_for_ipc() {
        let err = CommandError::new("BUSY", "Another request is in progress");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "BUSY");
        assert!(json["details"].is_null());
    }
}
