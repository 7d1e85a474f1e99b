//! Error types for prospecting.
//!
//! Three families: an integration that is not configured (fixable in
//! settings), remote failures (retry by re-running the step), and local
//! validation that stops an operation before anything is sent.

use crate::credits::Provider;
use crate::wizard::WizardStep;
use keel_backend::BackendError;
use thiserror::Error;

/// Server codes meaning the provider integration has no credentials.
const NOT_CONFIGURED_CODES: &[&str] = &[
    "NOT_CONFIGURED",
    "PROVIDER_NOT_CONFIGURED",
    "ai_ark_not_configured",
    "apollo_not_configured",
    "explorium_not_configured",
];

/// Errors raised by prospecting operations.
#[derive(Error, Debug)]
pub enum ProspectError {
    /// Provider integration has no credentials
    #[error("{provider} is not configured: {message}")]
    NotConfigured {
        /// Provider that rejected the call
        provider: Provider,
        /// Server message
        message: String,
    },

    /// Remote call failed
    #[error("request failed: {0}")]
    Backend(#[from] BackendError),

    /// Response did not have the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// Provider does not offer this kind of search
    #[error("{provider} does not support {operation}")]
    Unsupported {
        /// Provider
        provider: Provider,
        /// Operation name
        operation: &'static str,
    },

    /// Search attempted without any constraint
    #[error("at least one filter is required")]
    EmptyFilters,

    /// A range filter has min above max
    #[error("invalid range for {field}: min {min} is greater than max {max}")]
    InvalidRange {
        /// Filter name
        field: &'static str,
        /// Lower bound
        min: u64,
        /// Upper bound
        max: u64,
    },

    /// Import attempted with nothing selected
    #[error("no results selected")]
    EmptySelection,

    /// Similarity search seeds are missing, invalid, or too many
    #[error("invalid seed domains: {0}")]
    InvalidSeedDomains(String),

    /// Operation not valid in the current wizard step
    #[error("cannot {action} from the {from:?} step")]
    InvalidTransition {
        /// Step the wizard was in
        from: WizardStep,
        /// Attempted action
        action: &'static str,
    },

    /// Nothing more to load
    #[error("all results are already loaded")]
    NothingMore,

    /// Balance does not cover the estimated cost
    #[error("insufficient credits: balance {balance}, estimated cost {estimate}")]
    InsufficientCredits {
        /// Current balance
        balance: f64,
        /// Estimated cost of the next call
        estimate: f64,
    },

    /// Another call of this wizard is still in flight
    #[error("another request is in progress")]
    Busy,

    /// The wizard was closed; late responses are discarded
    #[error("wizard is closed")]
    Closed,

    /// The filters changed while the request was in flight; its page was dropped
    #[error("filters changed while the search was running")]
    QueryChanged,

    /// Invalid input outside the categories above
    #[error("validation error: {0}")]
    Validation(String),
}

impl ProspectError {
    /// Convert a backend error, recognising not-configured codes.
    #[must_use]
    pub fn from_backend(provider: Provider, err: BackendError) -> Self {
        match err.code() {
            Some(code) if NOT_CONFIGURED_CODES.contains(&code) => Self::NotConfigured {
                provider,
                message: match &err {
                    BackendError::Api { message, .. } => message.clone(),
                    other => other.to_string(),
                },
            },
            _ => Self::Backend(err),
        }
    }

    /// Whether the user must fix the integration in settings.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured { .. })
    }

    /// Whether the error was caught before any network call.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::EmptyFilters
                | Self::InvalidRange { .. }
                | Self::EmptySelection
                | Self::InvalidSeedDomains(_)
                | Self::InvalidTransition { .. }
                | Self::NothingMore
                | Self::InsufficientCredits { .. }
                | Self::Busy
                | Self::Closed
                | Self::QueryChanged
                | Self::Validation(_)
        )
    }
}

impl From<keel_core::KeelError> for ProspectError {
    fn from(err: keel_core::KeelError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for prospecting operations.
pub type Result<T> = std::result::Result<T, ProspectError>;
