//! Keel Backend - client for the hosted backend-as-a-service.
//!
//! Every outward call the Keel client makes goes through [`BackendClient`]:
//! stored procedures via [`BackendClient::rpc`] and edge functions via
//! [`BackendClient::invoke`]. Failures keep the server-provided `code`
//! so callers can tell a misconfigured integration apart from a generic
//! failure.
//!
//! ```rust,ignore
//! use keel_backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend)?.with_session(&session)?;
//! let count: i64 = client
//!     .rpc("get_pending_action_count", &serde_json::json!({ "p_user_id": user_id }))
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod error;

pub use client::{parse_api_error, BackendClient, FunctionResponse};
pub use error::{BackendError, Result};
