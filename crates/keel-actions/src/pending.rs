//! Pending-action badge count: a staleness-bounded cache and a background
//! poller that keeps it fresh.

use crate::error::Result;
use async_trait::async_trait;
use keel_backend::BackendClient;
use keel_core::UserId;
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Where pending counts come from.
#[async_trait]
pub trait PendingCountSource: Send + Sync {
    /// Current number of pending actions for the signed-in user.
    async fn fetch(&self) -> Result<u64>;
}

/// Reads the count through the `get_pending_action_count` procedure.
#[derive(Clone)]
pub struct RpcPendingCountSource {
    backend: BackendClient,
    user_id: UserId,
}

impl RpcPendingCountSource {
    /// Source for `user_id`.
    #[must_use]
    pub fn new(backend: BackendClient, user_id: UserId) -> Self {
        Self { backend, user_id }
    }
}

#[async_trait]
impl PendingCountSource for RpcPendingCountSource {
    async fn fetch(&self) -> Result<u64> {
        let count: i64 = self
            .backend
            .rpc(
                "get_pending_action_count",
                &json!({ "p_user_id": self.user_id.as_str() }),
            )
            .await?;
        // Negative counts from the procedure clamp to zero
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// Last fetched count and when it was fetched.
#[derive(Debug, Clone)]
pub struct PendingCountCache {
    stale_after: Duration,
    entry: Option<(u64, Instant)>,
}

impl PendingCountCache {
    /// Empty cache whose entries expire after `stale_after`.
    #[must_use]
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            entry: None,
        }
    }

    /// The staleness window.
    #[must_use]
    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Record a count fetched at `at`.
    pub fn store(&mut self, count: u64, at: Instant) {
        self.entry = Some((count, at));
    }

    /// The cached count if it is still fresh at `now`.
    #[must_use]
    pub fn get(&self, now: Instant) -> Option<u64> {
        match self.entry {
            Some((count, at)) if now.saturating_duration_since(at) < self.stale_after => {
                Some(count)
            }
            _ => None,
        }
    }

    /// The last count regardless of age.
    #[must_use]
    pub fn last(&self) -> Option<u64> {
        self.entry.map(|(count, _)| count)
    }

    /// True when empty or older than the staleness window.
    #[must_use]
    pub fn is_stale(&self, now: Instant) -> bool {
        self.get(now).is_none()
    }

    /// Forget the cached count. Called after approving or dismissing an
    /// action so the next read refetches.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// A source fronted by a cache.
pub struct PendingCountService {
    source: Arc<dyn PendingCountSource>,
    cache: Mutex<PendingCountCache>,
}

impl PendingCountService {
    /// Wrap `source` with a cache of the given window.
    #[must_use]
    pub fn new(source: Arc<dyn PendingCountSource>, stale_after: Duration) -> Self {
        Self {
            source,
            cache: Mutex::new(PendingCountCache::new(stale_after)),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, PendingCountCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached count when fresh, otherwise a fetch.
    pub async fn count(&self) -> Result<u64> {
        let cached = self.cache().get(Instant::now());
        match cached {
            Some(count) => Ok(count),
            None => self.refresh().await,
        }
    }

    /// Fetch unconditionally and update the cache.
    pub async fn refresh(&self) -> Result<u64> {
        let count = self.source.fetch().await?;
        self.cache().store(count, Instant::now());
        Ok(count)
    }

    /// Last count regardless of age.
    #[must_use]
    pub fn last(&self) -> Option<u64> {
        self.cache().last()
    }

    /// Drop the cached count.
    pub fn invalidate(&self) {
        self.cache().invalidate();
    }
}

/// Background task that refetches the count on an interval and publishes
/// each result on a watch channel.
///
/// Fetch failures are logged and leave the published value unchanged.
pub struct PendingCountPoller {
    updates: watch::Receiver<Option<u64>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PendingCountPoller {
    /// Start polling. The first fetch happens immediately.
    #[must_use]
    pub fn spawn(service: Arc<PendingCountService>, interval: Duration) -> Self {
        let (tx, updates) = watch::channel(service.last());
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        tracing::debug!("Starting pending count poller (interval: {:?})", interval);

        let handle = tokio::spawn(poll_loop(
            service,
            interval,
            tx,
            Arc::clone(&refresh),
            cancel.clone(),
        ));

        Self {
            updates,
            refresh,
            cancel,
            handle,
        }
    }

    /// Receiver that observes every published count.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<u64>> {
        self.updates.clone()
    }

    /// Most recently published count.
    #[must_use]
    pub fn latest(&self) -> Option<u64> {
        *self.updates.borrow()
    }

    /// Fetch now instead of waiting for the next tick.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Stop polling and wait for the task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.handle.await {
            tracing::warn!("Pending count poller ended abnormally: {}", err);
        }
    }
}

async fn poll_loop(
    service: Arc<PendingCountService>,
    interval: Duration,
    tx: watch::Sender<Option<u64>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
) {
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = timer.tick() => {}
            () = refresh.notified() => timer.reset(),
        }

        match service.refresh().await {
            Ok(count) => {
                tx.send_replace(Some(count));
            }
            Err(err) => tracing::warn!("Failed to refresh pending action count: {}", err),
        }
    }

    tracing::debug!("Pending count poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Counter(AtomicU64);

    #[async_trait]
    impl PendingCountSource for Counter {
        async fn fetch(&self) -> Result<u64> {
            Ok(self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[test]
    fn test_cache_staleness() {
        let start = Instant::now();
        let mut cache = PendingCountCache::new(Duration::from_secs(30));
        assert!(cache.is_stale(start));
        assert_eq!(cache.get(start), None);

        cache.store(4, start);
        assert_eq!(cache.get(start + Duration::from_secs(29)), Some(4));
        assert!(cache.is_stale(start + Duration::from_secs(30)));
        assert_eq!(cache.last(), Some(4));

        cache.invalidate();
        assert_eq!(cache.last(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_uses_fresh_cache() {
        let source = Arc::new(Counter(AtomicU64::new(0)));
        let service = PendingCountService::new(source, Duration::from_secs(30));

        assert_eq!(service.count().await.unwrap(), 1);
        assert_eq!(service.count().await.unwrap(), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(service.count().await.unwrap(), 2);

        service.invalidate();
        assert_eq!(service.count().await.unwrap(), 3);
    }
}
