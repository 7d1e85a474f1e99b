//! Pending count poller behaviour under paused time.

use async_trait::async_trait;
use keel_actions::{
    ActionError, PendingCountPoller, PendingCountService, PendingCountSource, Result,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Returns 10, 11, 12, ... and fails while `failing` is set.
struct SequenceSource {
    calls: AtomicU64,
    failing: AtomicBool,
}

impl SequenceSource {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        })
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PendingCountSource for SequenceSource {
    async fn fetch(&self) -> Result<u64> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ActionError::Validation("backend unavailable".to_string()));
        }
        Ok(10 + n)
    }
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

fn start(source: &Arc<SequenceSource>) -> PendingCountPoller {
    let service = Arc::new(PendingCountService::new(
        Arc::clone(source) as Arc<dyn PendingCountSource>,
        Duration::from_secs(60),
    ));
    PendingCountPoller::spawn(service, Duration::from_secs(30))
}

#[tokio::test(start_paused = true)]
async fn test_poller_fetches_immediately_then_on_interval() {
    let source = SequenceSource::new();
    let poller = start(&source);
    let mut updates = poller.subscribe();

    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow_and_update(), Some(10));

    tokio::time::advance(Duration::from_secs(29)).await;
    settle().await;
    assert_eq!(source.calls(), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow_and_update(), Some(11));
    assert_eq!(poller.latest(), Some(11));

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_keeps_last_value() {
    let source = SequenceSource::new();
    let poller = start(&source);
    let mut updates = poller.subscribe();
    updates.changed().await.unwrap();

    source.failing.store(true, Ordering::SeqCst);
    tokio::time::advance(Duration::from_secs(30)).await;
    settle().await;

    assert_eq!(source.calls(), 2);
    assert_eq!(poller.latest(), Some(10));
    assert!(!updates.has_changed().unwrap());

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_refresh_now_skips_the_wait() {
    let source = SequenceSource::new();
    let poller = start(&source);
    let mut updates = poller.subscribe();
    updates.changed().await.unwrap();

    poller.refresh_now();
    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow(), Some(11));

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_fetching() {
    let source = SequenceSource::new();
    let poller = start(&source);
    let mut updates = poller.subscribe();
    updates.changed().await.unwrap();

    poller.shutdown().await;
    tokio::time::advance(Duration::from_secs(120)).await;
    settle().await;

    assert_eq!(source.calls(), 1);
}
