use crate::error::CommandError;
use crate::state::AppState;
use keel_prospect::{
    CreditWidget, PageRequest, Provider, SearchFilterSet, SearchKind, SearchPage, SearchService,
};

/// First few rows of a filter search, used to check the filters before
/// pulling full pages. Refused up front when a known balance cannot cover
/// the estimate.
pub async fn search_preview(
    state: &AppState,
    provider: Option<Provider>,
    filters: SearchFilterSet,
) -> Result<SearchPage, CommandError> {
    filters.validate()?;

    let provider = provider.unwrap_or_else(|| state.default_provider());
    estimate_search_cost(state, Some(provider), filters.kind())
        .await?
        .ensure_affordable()?;

    let page_size = state.config.prospecting.preview_page_size;
    tracing::debug!(
        "Preview {} search via {}: {}",
        filters.kind().label(),
        provider,
        filters.describe()
    );

    let page = state
        .search_service(provider)
        .search(&filters, PageRequest::first(page_size))
        .await?;

    tracing::info!(
        "Preview returned {} of {} results ({} credits)",
        page.results.len(),
        page.pagination.total,
        page.credits_consumed
    );
    Ok(page)
}

/// Balance and estimated cost for the next search.
///
/// A balance lookup failure leaves the balance unknown rather than failing
/// the command, except when the provider has no credentials at all.
pub async fn estimate_search_cost(
    state: &AppState,
    provider: Option<Provider>,
    kind: SearchKind,
) -> Result<CreditWidget, CommandError> {
    let provider = provider.unwrap_or_else(|| state.default_provider());

    let balance = match state.search_service(provider).credit_balance().await {
        Ok(balance) => balance,
        Err(err) if err.is_not_configured() => return Err(err.into()),
        Err(err) => {
            tracing::warn!("Failed to fetch {} credit balance: {}", provider, err);
            None
        }
    };

    Ok(CreditWidget::new(balance, provider, kind))
}
