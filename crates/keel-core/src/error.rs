//! Core error types for the Keel client.
//!
//! This module defines the central error type shared by the subsystems.
//! Subsystem crates keep their own richer enums and convert at the edges.

use thiserror::Error;

/// Central error type for Keel operations.
#[derive(Error, Debug)]
pub enum KeelError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session errors (signed out, expired token)
    #[error("session error: {0}")]
    Session(String),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `KeelError`.
pub type Result<T> = std::result::Result<T, KeelError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeelError::Validation("organization name is empty".to_string());
        assert_eq!(err.to_string(), "validation error: organization name is empty");

        let err = ConfigError::InvalidValue {
            field: "polling.interval_secs".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for polling.interval_secs: must be positive"
        );
    }

    #[test]
    fn test_error_from_config() {
        let config_err = ConfigError::NoConfigDir;
        let keel_err: KeelError = config_err.into();
        assert!(matches!(keel_err, KeelError::Config(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let keel_err: KeelError = io_err.into();
        assert!(matches!(keel_err, KeelError::Io(_)));
    }
}
