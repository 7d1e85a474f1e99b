//! Type-the-name confirmation for destructive actions.

use std::future::Future;
use thiserror::Error;

/// Why a confirmed action did not complete.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmError<E> {
    /// Typed text does not match the expected name; nothing was called
    #[error("confirmation text does not match")]
    Mismatch,

    /// The action was called and failed
    #[error("action failed: {0}")]
    Failed(E),
}

/// Guards a destructive action behind typing an exact name.
///
/// The match is exact and case-sensitive. After a submission the typed text
/// is cleared whether the action succeeded or not.
#[derive(Debug, Clone)]
pub struct DeleteConfirmation {
    expected: String,
    typed: String,
    submitting: bool,
}

impl DeleteConfirmation {
    /// Require `expected` (e.g. the organization name) to be typed.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            typed: String::new(),
            submitting: false,
        }
    }

    /// Replace the typed text.
    pub fn type_text(&mut self, text: impl Into<String>) {
        self.typed = text.into();
    }

    /// Current typed text.
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the destructive button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.expected.is_empty() && self.typed == self.expected
    }

    /// Run the action once if the typed text matches.
    ///
    /// # Errors
    /// `Mismatch` without calling `action`, or `Failed` with the action's error.
    pub async fn submit<F, Fut, T, E>(&mut self, action: F) -> Result<T, ConfirmError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.can_submit() {
            return Err(ConfirmError::Mismatch);
        }

        self.submitting = true;
        let result = action().await;
        self.submitting = false;
        self.typed.clear();

        result.map_err(ConfirmError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_can_submit_requires_exact_name() {
        let mut confirm = DeleteConfirmation::new("Acme Corp");
        assert!(!confirm.can_submit());

        confirm.type_text("acme corp");
        assert!(!confirm.can_submit());

        confirm.type_text("Acme Corp ");
        assert!(!confirm.can_submit());

        confirm.type_text("Acme Corp");
        assert!(confirm.can_submit());
    }

    #[test]
    fn test_empty_expected_never_enables() {
        let mut confirm = DeleteConfirmation::new("");
        confirm.type_text("");
        assert!(!confirm.can_submit());
    }

    #[tokio::test]
    async fn test_submit_success_calls_once_and_clears() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let mut confirm = DeleteConfirmation::new("Acme Corp");
        confirm.type_text("Acme Corp");

        let result: Result<(), ConfirmError<String>> = confirm
            .submit(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(confirm.typed(), "");
        assert!(!confirm.can_submit());
    }

    #[tokio::test]
    async fn test_submit_failure_still_clears() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let mut confirm = DeleteConfirmation::new("Acme Corp");
        confirm.type_text("Acme Corp");

        let result: Result<(), ConfirmError<String>> = confirm
            .submit(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("permission denied".to_string())
            })
            .await;

        assert_eq!(
            result,
            Err(ConfirmError::Failed("permission denied".to_string()))
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(confirm.typed(), "");
        assert!(!confirm.is_submitting());
    }

    #[tokio::test]
    async fn test_mismatch_makes_no_call() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let mut confirm = DeleteConfirmation::new("Acme Corp");
        confirm.type_text("Acme");

        let result: Result<(), ConfirmError<String>> = confirm
            .submit(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert_eq!(result, Err(ConfirmError::Mismatch));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(confirm.typed(), "Acme");
    }
}
