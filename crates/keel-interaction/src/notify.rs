//! Transient notices raised by operations.
//!
//! The host UI owns the actual toast rendering; operations only describe
//! what should be shown through a [`Notifier`].

use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Operation completed
    Success,
    /// Neutral information
    Info,
    /// Local validation problem, nothing was sent
    Warning,
    /// Remote failure
    Error,
}

/// A notice to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// User-facing text
    pub message: String,
    /// Optional route the notice links to (e.g. settings)
    pub link: Option<String>,
}

impl Notice {
    /// Create a notice without a link.
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            link: None,
        }
    }

    /// Attach a route to the notice.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync {
    /// Publish a notice.
    fn notify(&self, notice: Notice);

    /// Publish a success notice.
    fn success(&self, message: &str) {
        self.notify(Notice::new(NoticeLevel::Success, message));
    }

    /// Publish a warning notice.
    fn warning(&self, message: &str) {
        self.notify(Notice::new(NoticeLevel::Warning, message));
    }

    /// Publish an error notice.
    fn error(&self, message: &str) {
        self.notify(Notice::new(NoticeLevel::Error, message));
    }
}

/// Notifier that writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Warning => tracing::warn!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
    }
}

/// Notifier that keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent notice.
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of notices at a level.
    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.warning("Select at least one row");
        notifier.error("Search failed");
        notifier.notify(Notice::new(NoticeLevel::Error, "Not configured").with_link("/settings"));

        assert_eq!(notifier.notices().len(), 3);
        assert_eq!(notifier.count(NoticeLevel::Error), 2);
        assert_eq!(notifier.count(NoticeLevel::Success), 0);
        assert_eq!(
            notifier.last().and_then(|n| n.link),
            Some("/settings".to_string())
        );
    }

    #[test]
    fn test_tracing_notifier_accepts_all_levels() {
        let notifier = TracingNotifier;
        notifier.success("Imported 25 rows");
        notifier.warning("Select at least one row");
        notifier.error("Search failed");
    }

    #[test]
    fn test_notice_link() {
        let notice = Notice::new(NoticeLevel::Info, "Preview ready");
        assert!(notice.link.is_none());
        let notice = notice.with_link("/prospecting");
        assert_eq!(notice.link.as_deref(), Some("/prospecting"));
    }
}
