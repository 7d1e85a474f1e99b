//! Async driver of the search wizard.
//!
//! Each remote step follows the same shape: check the step locally, raise
//! the loading flag, await the service, lower the flag, then either reduce
//! the result into the state or publish a notice. Only one call runs at a
//! time per wizard. Once [`WizardController::close`] is called, responses
//! that arrive afterwards are dropped.

use crate::credits::{CreditWidget, Provider};
use crate::error::{ProspectError, Result};
use crate::icp::IcpProfile;
use crate::result::{ResultId, SearchPage};
use crate::service::{PageRequest, SearchService};
use crate::wizard::{reduce, WizardEvent, WizardLimits, WizardQuery, WizardState, WizardStep};
use keel_core::RecordId;
use keel_interaction::{Notice, NoticeLevel, Notifier};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Route of the settings page for provider integrations.
pub const INTEGRATIONS_SETTINGS_PATH: &str = "/settings/integrations";

/// Remote call in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Preview search
    Search,
    /// Full pull
    Pull,
    /// Next page
    LoadMore,
    /// Import of the selection
    Import,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Self::Search | Self::Pull | Self::LoadMore => "Search failed. Please try again.",
            Self::Import => "Import failed. Please try again.",
        }
    }
}

/// Where to go after a successful import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// Route of the created table
    pub path: String,
    /// Created table
    pub table_id: RecordId,
    /// Rows imported
    pub row_count: u64,
}

/// Clears the loading flag when the call ends, however it ends.
struct LoadingGuard<'a> {
    slot: &'a Mutex<Option<Operation>>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// One mounted wizard.
pub struct WizardController {
    service: Arc<dyn SearchService>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<WizardState>,
    loading: Mutex<Option<Operation>>,
    balance: Mutex<Option<f64>>,
    cancel: CancellationToken,
}

impl WizardController {
    /// Mount a wizard over `service`.
    pub fn new(
        service: Arc<dyn SearchService>,
        notifier: Arc<dyn Notifier>,
        query: WizardQuery,
        limits: WizardLimits,
    ) -> Self {
        Self {
            service,
            notifier,
            state: Mutex::new(WizardState::new(query, limits)),
            loading: Mutex::new(None),
            balance: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    /// Copy of the current state.
    pub fn state(&self) -> WizardState {
        self.lock_state().clone()
    }

    /// Current step.
    pub fn step(&self) -> WizardStep {
        self.lock_state().step
    }

    /// Call in flight, if any.
    pub fn loading(&self) -> Option<Operation> {
        *self.loading.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the wizard was closed.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token cancelled when the wizard closes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Provider behind the wizard.
    pub fn provider(&self) -> Provider {
        self.service.provider()
    }

    /// Unmount. Responses still in flight are discarded.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Closing search wizard");
            self.cancel.cancel();
        }
    }

    /// Replace the query while editing filters.
    ///
    /// # Errors
    /// `InvalidTransition` outside the input step, `Busy` during a call.
    pub fn set_query(&self, query: WizardQuery) -> Result<()> {
        self.ensure_idle()?;
        self.dispatch(WizardEvent::SetQuery(query))
    }

    /// Seed the filters from a saved profile.
    ///
    /// # Errors
    /// As for [`WizardController::set_query`].
    pub fn apply_icp(&self, profile: &IcpProfile) -> Result<()> {
        debug!("Applying ICP profile {}", profile.name);
        self.set_query(WizardQuery::Filters(profile.filters.clone()))
    }

    /// Flip one row.
    ///
    /// # Errors
    /// As for [`reduce`].
    pub fn toggle(&self, id: ResultId) -> Result<()> {
        self.dispatch(WizardEvent::Toggle(id))
    }

    /// Select every loaded row.
    ///
    /// # Errors
    /// As for [`reduce`].
    pub fn select_all(&self) -> Result<()> {
        self.dispatch(WizardEvent::SelectAll)
    }

    /// Clear the selection.
    ///
    /// # Errors
    /// As for [`reduce`].
    pub fn deselect_all(&self) -> Result<()> {
        self.dispatch(WizardEvent::DeselectAll)
    }

    /// Go back one step.
    ///
    /// # Errors
    /// `InvalidTransition` at the input step, `Busy` during a call.
    pub fn back(&self) -> Result<()> {
        self.ensure_idle()?;
        self.dispatch(WizardEvent::Back)
    }

    /// Start over with empty filters and zero credits.
    ///
    /// # Errors
    /// `Busy` during a call.
    pub fn reset(&self) -> Result<()> {
        self.ensure_idle()?;
        self.dispatch(WizardEvent::Reset)
    }

    /// Balance and estimated cost of the next search.
    ///
    /// A failed balance lookup leaves the balance unknown. The fetched
    /// balance is kept and checked before each search until the next
    /// refresh.
    pub async fn credit_widget(&self) -> CreditWidget {
        let kind = self.lock_state().query.kind();
        let balance = match self.service.credit_balance().await {
            Ok(balance) => balance,
            Err(err) => {
                warn!("Failed to fetch credit balance: {err}");
                None
            }
        };
        *self.lock_balance() = balance;
        CreditWidget::new(balance, self.service.provider(), kind)
    }

    /// Last fetched balance, less the credits consumed since.
    pub fn cached_balance(&self) -> Option<f64> {
        *self.lock_balance()
    }

    /// Run the preview search.
    ///
    /// # Errors
    /// Local validation errors before any call; the service error after a
    /// failed call; `Closed` if the wizard closed meanwhile.
    pub async fn search(&self) -> Result<()> {
        let (query, limits) = self.prepare(WizardStep::Input, "search")?;
        self.ensure_affordable(&query)?;
        let _guard = self.begin(Operation::Search)?;
        info!("Running preview search: {}", query.describe());

        let outcome = self
            .fetch(&query, &limits, PageRequest::first(limits.preview_page_size))
            .await;
        self.settle(Operation::Search, &query, outcome, WizardEvent::PreviewLoaded)
    }

    /// Pull the first full page, replacing the preview.
    ///
    /// # Errors
    /// As for [`WizardController::search`].
    pub async fn pull_full(&self) -> Result<()> {
        let (query, limits) = self.prepare(WizardStep::Preview, "pull full results")?;
        self.ensure_affordable(&query)?;
        let _guard = self.begin(Operation::Pull)?;

        let outcome = self
            .fetch(&query, &limits, PageRequest::first(limits.full_page_size))
            .await;
        self.settle(Operation::Pull, &query, outcome, WizardEvent::FullLoaded)
    }

    /// Append the next page.
    ///
    /// # Errors
    /// `NothingMore` when everything is loaded, otherwise as for
    /// [`WizardController::search`].
    pub async fn load_more(&self) -> Result<()> {
        self.ensure_open()?;
        let (query, limits, page) = {
            let state = self.lock_state();
            if state.step != WizardStep::Results {
                return Err(ProspectError::InvalidTransition {
                    from: state.step,
                    action: "load more",
                });
            }
            if !state.can_load_more() {
                return Err(ProspectError::NothingMore);
            }
            (state.query.clone(), state.limits, state.next_page())
        };
        self.ensure_affordable(&query)?;
        let _guard = self.begin(Operation::LoadMore)?;
        debug!("Loading page {page}");

        let outcome = self
            .fetch(&query, &limits, PageRequest::new(page, limits.full_page_size))
            .await;
        self.settle(Operation::LoadMore, &query, outcome, WizardEvent::MoreLoaded)
    }

    /// Import the selection into a new table and close the wizard.
    ///
    /// An empty selection publishes a warning and sends nothing. A failed
    /// import keeps the wizard state for a retry.
    ///
    /// # Errors
    /// `EmptySelection`, the service error, or `Closed`.
    pub async fn import(&self, table_name: Option<String>) -> Result<Navigation> {
        self.ensure_open()?;
        let prepared = self.lock_state().import_request(table_name);
        let request = match prepared {
            Ok(request) => request,
            Err(ProspectError::EmptySelection) => {
                self.notifier.warning("Select at least one result to import.");
                return Err(ProspectError::EmptySelection);
            }
            Err(err) => return Err(err),
        };
        let _guard = self.begin(Operation::Import)?;
        info!("Importing {} rows", request.ai_ark_ids.len());

        let outcome = self.service.import(&request).await;
        self.ensure_open()?;

        match outcome {
            Ok(created) => {
                self.notifier.notify(
                    Notice::new(
                        NoticeLevel::Success,
                        format!("Imported {} rows", created.row_count),
                    )
                    .with_link(format!("/tables/{}", created.table_id)),
                );
                let navigation = Navigation {
                    path: format!("/tables/{}", created.table_id),
                    table_id: created.table_id,
                    row_count: created.row_count,
                };
                self.close();
                Ok(navigation)
            }
            Err(err) => Err(self.fail(Operation::Import, err)),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_balance(&self) -> MutexGuard<'_, Option<f64>> {
        self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refuse when the cached balance is known and below the estimate.
    fn ensure_affordable(&self, query: &WizardQuery) -> Result<()> {
        CreditWidget::new(self.cached_balance(), self.service.provider(), query.kind())
            .ensure_affordable()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            debug!("Dropping wizard operation after close");
            return Err(ProspectError::Closed);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.loading().is_some() {
            return Err(ProspectError::Busy);
        }
        Ok(())
    }

    fn dispatch(&self, event: WizardEvent) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.lock_state();
        *state = reduce(state.clone(), event)?;
        Ok(())
    }

    fn prepare(
        &self,
        expected: WizardStep,
        action: &'static str,
    ) -> Result<(WizardQuery, WizardLimits)> {
        self.ensure_open()?;
        let state = self.lock_state();
        if state.step != expected {
            return Err(ProspectError::InvalidTransition {
                from: state.step,
                action,
            });
        }
        state.query.validate(&state.limits)?;
        Ok((state.query.clone(), state.limits))
    }

    fn begin(&self, operation: Operation) -> Result<LoadingGuard<'_>> {
        let mut slot = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = *slot {
            debug!("Rejecting {operation:?} while {current:?} is in flight");
            return Err(ProspectError::Busy);
        }
        *slot = Some(operation);
        Ok(LoadingGuard {
            slot: &self.loading,
        })
    }

    async fn fetch(
        &self,
        query: &WizardQuery,
        limits: &WizardLimits,
        page: PageRequest,
    ) -> Result<SearchPage> {
        match query {
            WizardQuery::Filters(filters) => self.service.search(filters, page).await,
            WizardQuery::Similarity(_) => match query.similarity_request(limits)? {
                Some(request) => self.service.similarity_search(&request, page).await,
                None => Err(ProspectError::Validation(
                    "similarity query without seeds".to_string(),
                )),
            },
        }
    }

    fn settle(
        &self,
        operation: Operation,
        dispatched: &WizardQuery,
        outcome: Result<SearchPage>,
        loaded: fn(SearchPage) -> WizardEvent,
    ) -> Result<()> {
        self.ensure_open()?;
        match outcome {
            Ok(page) => {
                debug!(
                    "{operation:?} returned {} rows, {} credits",
                    page.results.len(),
                    page.credits_consumed
                );
                if let Some(balance) = self.lock_balance().as_mut() {
                    *balance -= page.credits_consumed.max(0.0);
                }
                if self.lock_state().query != *dispatched {
                    debug!("Dropping {operation:?} page for superseded filters");
                    return Err(ProspectError::QueryChanged);
                }
                self.dispatch(loaded(page))
            }
            Err(err) => Err(self.fail(operation, err)),
        }
    }

    fn fail(&self, operation: Operation, err: ProspectError) -> ProspectError {
        if let ProspectError::NotConfigured { provider, .. } = &err {
            self.notifier.notify(
                Notice::new(
                    NoticeLevel::Error,
                    format!(
                        "{provider} is not configured. Add your API key in Settings to continue."
                    ),
                )
                .with_link(INTEGRATIONS_SETTINGS_PATH),
            );
        } else {
            warn!("{operation:?} failed: {err}");
            self.notifier.error(operation.failure_message());
        }

        let mut state = self.lock_state();
        if let Ok(next) = reduce(state.clone(), WizardEvent::Failed(err.to_string())) {
            *state = next;
        }
        err
    }
}
