//! Keel Core - Foundation crate for the Keel sales-productivity client.
//!
//! This crate provides shared types, error handling, configuration management,
//! and the explicit session context that all other Keel crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`UserId`, `OrgId`, `RecordId`, `Timestamp`)
//! - [`session`] - Signed-in user context passed explicitly to services
//!
//! # Example
//!
//! ```rust
//! use keel_core::{AppConfig, Session, UserId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.prospecting.preview_page_size, 5);
//!
//! let user = UserId::new("550e8400-e29b-41d4-a716-446655440000")?;
//! let session = Session::new(user, "token");
//! assert!(session.is_signed_in());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BackendConfig, InteractionConfig, PollingConfig, ProspectingConfig};
pub use error::{ConfigError, ConfigResult, KeelError, Result};
pub use session::Session;
pub use types::{OrgId, RecordId, Timestamp, UserId};
