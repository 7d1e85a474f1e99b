//! Application state management.

use anyhow::Context;
use keel_actions::{PendingCountPoller, PendingCountService, RpcPendingCountSource};
use keel_backend::BackendClient;
use keel_core::{AppConfig, Session};
use keel_prospect::{HttpSearchService, Provider};
use std::sync::Arc;

/// Shared state handed to every command.
pub struct AppState {
    /// Loaded configuration
    pub config: AppConfig,

    /// Backend client carrying the session token
    pub backend: BackendClient,

    /// The signed-in user's session
    pub session: Session,

    /// Cached pending-action count, shared with the badge poller
    pub pending: Arc<PendingCountService>,
}

impl AppState {
    /// Build state for a signed-in session.
    pub fn new(config: AppConfig, session: Session) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;

        let backend = BackendClient::new(&config.backend)
            .context("failed to create backend client")?
            .with_session(&session)
            .context("session has no access token")?;

        let source = RpcPendingCountSource::new(backend.clone(), session.user_id().clone());
        let pending = Arc::new(PendingCountService::new(
            Arc::new(source),
            config.polling.stale_after(),
        ));

        tracing::info!(
            "Backend: {} (user {})",
            config.backend.url,
            session.user_id()
        );

        Ok(Self {
            config,
            backend,
            session,
            pending,
        })
    }

    /// Load configuration from disk and the environment, then build state.
    pub fn load(session: Session) -> anyhow::Result<Self> {
        let config = AppConfig::load_with_env().context("failed to load configuration")?;
        Self::new(config, session)
    }

    /// Configured default provider, falling back to AI Ark.
    pub fn default_provider(&self) -> Provider {
        self.config
            .prospecting
            .default_provider
            .parse()
            .unwrap_or_else(|err| {
                tracing::warn!("{}; using {}", err, Provider::AiArk);
                Provider::AiArk
            })
    }

    /// Search service for `provider`.
    pub fn search_service(&self, provider: Provider) -> HttpSearchService {
        HttpSearchService::new(self.backend.clone(), provider)
    }

    /// Start the sidebar badge poller at the configured interval.
    pub fn spawn_pending_poller(&self) -> PendingCountPoller {
        PendingCountPoller::spawn(Arc::clone(&self.pending), self.config.polling.interval())
    }
}
