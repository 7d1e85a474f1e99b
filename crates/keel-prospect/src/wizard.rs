//! Search wizard state machine.
//!
//! The wizard moves `Input -> Preview -> Results` by explicit user action,
//! with one `Back` edge per step and a `Reset` edge from anywhere. All
//! transitions go through [`reduce`], a pure function from state and event
//! to the next state. The credit counter travels inside the state so the
//! "never decreases except on reset" rule can be checked on every step.

use crate::credits::{CreditCounter, SearchKind};
use crate::error::{ProspectError, Result};
use crate::filters::SearchFilterSet;
use crate::result::{NormalizedResult, Pagination, ResultId, SearchPage};
use crate::selection::SelectionSet;
use crate::service::ImportRequest;
use crate::similarity::{SimilarityInput, SimilarityRequest};
use keel_core::ProspectingConfig;
use serde::Serialize;
use std::collections::HashSet;

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Editing filters
    Input,
    /// Small exploratory page shown
    Preview,
    /// Full pages shown, rows selectable
    Results,
}

impl WizardStep {
    /// Step number shown by the filter wizard, starting at 1.
    #[must_use]
    pub fn step_number(&self) -> u8 {
        match self {
            Self::Input => 1,
            Self::Preview => 2,
            Self::Results => 3,
        }
    }

    /// Step title.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Define search",
            Self::Preview => "Preview",
            Self::Results => "Select and import",
        }
    }
}

/// Page sizes and seed bounds of one wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardLimits {
    /// Rows in the preview page
    pub preview_page_size: u32,
    /// Rows per full page
    pub full_page_size: u32,
    /// Upper bound on similarity seeds
    pub max_similarity_seeds: usize,
}

impl Default for WizardLimits {
    fn default() -> Self {
        Self::from_config(&ProspectingConfig::default())
    }
}

impl WizardLimits {
    /// Limits from configuration.
    #[must_use]
    pub fn from_config(config: &ProspectingConfig) -> Self {
        Self {
            preview_page_size: config.preview_page_size,
            full_page_size: config.full_page_size,
            max_similarity_seeds: config.max_similarity_seeds,
        }
    }
}

/// What the wizard searches for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WizardQuery {
    /// Company or people filters
    Filters(SearchFilterSet),
    /// Lookalikes of seed domains
    Similarity(SimilarityInput),
}

impl WizardQuery {
    /// Search kind of the query.
    #[must_use]
    pub fn kind(&self) -> SearchKind {
        match self {
            Self::Filters(f) => f.kind(),
            Self::Similarity(_) => SearchKind::Similarity,
        }
    }

    /// Whether the query has no constraint at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Filters(f) => f.is_empty(),
            Self::Similarity(s) => !s.has_seeds(),
        }
    }

    /// Check the query can be sent.
    ///
    /// # Errors
    /// The filter or seed validation error.
    pub fn validate(&self, limits: &WizardLimits) -> Result<()> {
        match self {
            Self::Filters(f) => f.validate(),
            Self::Similarity(s) => s.to_request(limits.max_similarity_seeds).map(|_| ()),
        }
    }

    /// Normalized similarity request, if this is a similarity query.
    ///
    /// # Errors
    /// The seed validation error.
    pub fn similarity_request(&self, limits: &WizardLimits) -> Result<Option<SimilarityRequest>> {
        match self {
            Self::Filters(_) => Ok(None),
            Self::Similarity(s) => s.to_request(limits.max_similarity_seeds).map(Some),
        }
    }

    /// Human-readable description for the import.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Filters(f) => f.describe(),
            Self::Similarity(s) => s.describe(),
        }
    }

    /// Same kind of query with every constraint cleared.
    #[must_use]
    pub fn cleared(&self) -> Self {
        match self {
            Self::Filters(SearchFilterSet::Company(_)) => Self::Filters(SearchFilterSet::company()),
            Self::Filters(SearchFilterSet::People(_)) => Self::Filters(SearchFilterSet::people()),
            Self::Similarity(_) => Self::Similarity(SimilarityInput::default()),
        }
    }
}

/// Everything one wizard instance holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardState {
    /// Current step
    pub step: WizardStep,
    /// Page sizes in force
    pub limits: WizardLimits,
    /// Query being built or run
    pub query: WizardQuery,
    /// Preview rows; discarded when the full pull lands
    pub preview: Vec<NormalizedResult>,
    /// Pagination reported with the preview
    pub preview_pagination: Option<Pagination>,
    /// Full rows, deduplicated by identifier
    pub full: Vec<NormalizedResult>,
    /// Pagination reported with the latest full page
    pub pagination: Option<Pagination>,
    /// Index of the latest full page loaded
    pub page: u32,
    /// Rows chosen for import
    pub selection: SelectionSet,
    /// Credits consumed in this wizard lifetime
    pub credits: CreditCounter,
    /// Message of the most recent failure, cleared by the next success
    pub last_error: Option<String>,
}

impl WizardState {
    /// Fresh wizard at the input step.
    #[must_use]
    pub fn new(query: WizardQuery, limits: WizardLimits) -> Self {
        Self {
            step: WizardStep::Input,
            limits,
            query,
            preview: Vec::new(),
            preview_pagination: None,
            full: Vec::new(),
            pagination: None,
            page: 0,
            selection: SelectionSet::new(),
            credits: CreditCounter::new(),
            last_error: None,
        }
    }

    /// Whether the search button is enabled.
    #[must_use]
    pub fn can_search(&self) -> bool {
        self.step == WizardStep::Input && self.query.validate(&self.limits).is_ok()
    }

    /// Whether the full-pull button is enabled.
    #[must_use]
    pub fn can_pull(&self) -> bool {
        self.step == WizardStep::Preview && self.query.validate(&self.limits).is_ok()
    }

    /// Whether "load more" is enabled: loaded count below the reported
    /// total, and a next page exists when the provider reports page counts.
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        if self.step != WizardStep::Results {
            return false;
        }
        let Some(pagination) = self.pagination else {
            return false;
        };
        let loaded = self.full.len() as u64;
        let pages_left = pagination.total_pages == 0 || self.next_page() < pagination.total_pages;
        loaded < pagination.total && pages_left
    }

    /// Page index the next "load more" requests.
    #[must_use]
    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }

    /// Total rows the provider reported for the current search.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.pagination
            .or(self.preview_pagination)
            .map(|p| p.total)
    }

    /// Build the import call for the current selection.
    ///
    /// # Errors
    /// `InvalidTransition` outside the results step, `EmptySelection` when
    /// nothing is selected.
    pub fn import_request(&self, table_name: Option<String>) -> Result<ImportRequest> {
        if self.step != WizardStep::Results {
            return Err(ProspectError::InvalidTransition {
                from: self.step,
                action: "import",
            });
        }
        if self.selection.is_empty() {
            return Err(ProspectError::EmptySelection);
        }
        Ok(ImportRequest {
            kind: self.query.kind(),
            ai_ark_ids: self.selection.selected_in(&self.full),
            query_description: self.query.describe(),
            table_name: table_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        })
    }
}

/// Something that happened to the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// Filters or seeds edited
    SetQuery(WizardQuery),
    /// Preview call succeeded
    PreviewLoaded(SearchPage),
    /// Full pull succeeded
    FullLoaded(SearchPage),
    /// Load-more call succeeded
    MoreLoaded(SearchPage),
    /// Row checkbox clicked
    Toggle(ResultId),
    /// Select every loaded row
    SelectAll,
    /// Clear the selection
    DeselectAll,
    /// Header checkbox clicked
    ToggleAll,
    /// A remote call failed
    Failed(String),
    /// Go back one step
    Back,
    /// Start over
    Reset,
}

impl WizardEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SetQuery(_) => "edit the query",
            Self::PreviewLoaded(_) => "show a preview",
            Self::FullLoaded(_) => "show full results",
            Self::MoreLoaded(_) => "load more",
            Self::Toggle(_) | Self::SelectAll | Self::DeselectAll | Self::ToggleAll => "select",
            Self::Failed(_) => "fail",
            Self::Back => "go back",
            Self::Reset => "reset",
        }
    }
}

/// Apply one event.
///
/// # Errors
/// `InvalidTransition` when the event does not apply to the current step;
/// `Validation` when toggling a row that is not loaded.
pub fn reduce(state: WizardState, event: WizardEvent) -> Result<WizardState> {
    use WizardEvent as E;
    use WizardStep as S;

    let step = state.step;
    let invalid = |event: &WizardEvent| ProspectError::InvalidTransition {
        from: step,
        action: event.name(),
    };

    match (step, event) {
        (S::Input, E::SetQuery(query)) => Ok(WizardState {
            query,
            last_error: None,
            ..state
        }),

        (S::Input, E::PreviewLoaded(page)) => {
            let mut results = page.results;
            results.truncate(state.limits.preview_page_size as usize);
            Ok(WizardState {
                step: S::Preview,
                preview: results,
                preview_pagination: Some(page.pagination),
                credits: state.credits.add(page.credits_consumed),
                last_error: None,
                ..state
            })
        }

        (S::Preview, E::FullLoaded(page)) => {
            let mut full = Vec::new();
            let mut seen = HashSet::new();
            for row in page.results {
                if full.len() == state.limits.full_page_size as usize {
                    break;
                }
                if seen.insert(row.id().clone()) {
                    full.push(row);
                }
            }
            let mut selection = SelectionSet::new();
            selection.select_all(&full);
            Ok(WizardState {
                step: S::Results,
                preview: Vec::new(),
                full,
                pagination: Some(page.pagination),
                // The full pull always requests page 0; the echoed index is ignored
                page: 0,
                selection,
                credits: state.credits.add(page.credits_consumed),
                last_error: None,
                ..state
            })
        }

        (S::Results, E::MoreLoaded(page)) => {
            let mut state = state;
            let mut seen: HashSet<ResultId> = state.full.iter().map(|r| r.id().clone()).collect();
            let mut added = 0usize;
            for row in page.results {
                if added == state.limits.full_page_size as usize {
                    break;
                }
                if seen.insert(row.id().clone()) {
                    state.selection.select(row.id());
                    state.full.push(row);
                    added += 1;
                }
            }
            state.page = state.next_page();
            state.pagination = Some(page.pagination);
            state.credits = state.credits.add(page.credits_consumed);
            state.last_error = None;
            Ok(state)
        }

        (S::Results, E::Toggle(id)) => {
            if !state.full.iter().any(|r| r.id() == &id) {
                return Err(ProspectError::Validation(format!(
                    "result {id} is not loaded"
                )));
            }
            let mut state = state;
            state.selection.toggle(&id);
            Ok(state)
        }
        (S::Results, E::SelectAll) => {
            let mut state = state;
            state.selection.select_all(&state.full);
            Ok(state)
        }
        (S::Results, E::DeselectAll) => {
            let mut state = state;
            state.selection.deselect_all();
            Ok(state)
        }
        (S::Results, E::ToggleAll) => {
            let mut state = state;
            state.selection.toggle_all(&state.full);
            Ok(state)
        }

        (_, E::Failed(message)) => Ok(WizardState {
            last_error: Some(message),
            ..state
        }),

        (S::Results, E::Back) => Ok(WizardState {
            step: S::Preview,
            full: Vec::new(),
            pagination: None,
            page: 0,
            selection: SelectionSet::new(),
            last_error: None,
            ..state
        }),
        (S::Preview, E::Back) => Ok(WizardState {
            step: S::Input,
            preview: Vec::new(),
            preview_pagination: None,
            last_error: None,
            ..state
        }),

        (_, E::Reset) => Ok(WizardState::new(state.query.cleared(), state.limits)),

        (_, event) => Err(invalid(&event)),
    }
}
