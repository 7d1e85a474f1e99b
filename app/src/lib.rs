//! Keel application shell
//!
//! Thin command layer the desktop and web shells call into. Business logic
//! lives in the `crates/` directory; this crate wires configuration, the
//! backend client, and the session together and converts errors into
//! [`CommandError`](error::CommandError).

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;

/// Health check.
pub fn health_check() -> String {
    info!("Health check called");
    "ok".to_string()
}

/// Application version.
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the default
/// `info,keel=debug` filter.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,keel=debug"));

    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();

    match result {
        Ok(()) => info!("Starting Keel v{}", env!("CARGO_PKG_VERSION")),
        Err(err) => tracing::debug!("Tracing already initialized: {}", err),
    }
}
