//! Search service backed by the backend's provider edge functions.
//!
//! Each provider is reached through three functions named after its slug:
//! `{slug}-search`, `{slug}-similarity`, and `import-from-{slug}`.

use super::common::{credits_consumed, import_outcome};
use crate::credits::Provider;
use crate::error::{ProspectError, Result};
use crate::filters::{CompanyFilters, PeopleFilters};
use crate::result::{NormalizedResult, SearchPage};
use crate::service::{ImportOutcome, ImportRequest, PageRequest, SearchService};
use crate::similarity::SimilarityRequest;
use async_trait::async_trait;
use keel_backend::BackendClient;
use serde::Serialize;
use serde_json::json;

/// Search service for one provider over HTTP.
pub struct HttpSearchService {
    backend: BackendClient,
    provider: Provider,
}

impl HttpSearchService {
    /// Service for `provider`, calling through `backend`.
    #[must_use]
    pub fn new(backend: BackendClient, provider: Provider) -> Self {
        Self { backend, provider }
    }

    fn search_function(&self) -> String {
        format!("{}-search", self.provider.slug())
    }

    fn similarity_function(&self) -> String {
        format!("{}-similarity", self.provider.slug())
    }

    fn import_function(&self) -> String {
        format!("import-from-{}", self.provider.slug())
    }

    /// Convert a search into the edge function's request body.
    fn to_search_body<'a, F: Serialize>(
        action: &'static str,
        filters: &'a F,
        page: PageRequest,
    ) -> SearchBody<'a, F> {
        SearchBody {
            action,
            filters,
            page: page.page,
            per_page: page.per_page,
        }
    }

    async fn call_search<B: Serialize + Sync>(
        &self,
        function: &str,
        body: &B,
        parse_row: fn(&serde_json::Value) -> Result<NormalizedResult>,
    ) -> Result<SearchPage> {
        let response = self
            .backend
            .invoke(function, body)
            .await
            .map_err(|e| ProspectError::from_backend(self.provider, e))?;

        let credits = credits_consumed(&response);
        let page = SearchPage::from_body(&response.body, parse_row, credits)?;
        tracing::debug!(
            "{function} returned {} of {} rows",
            page.pagination.returned,
            page.pagination.total
        );
        Ok(page)
    }
}

#[async_trait]
impl SearchService for HttpSearchService {
    async fn search_companies(
        &self,
        filters: &CompanyFilters,
        page: PageRequest,
    ) -> Result<SearchPage> {
        let body = Self::to_search_body("company_search", filters, page);
        self.call_search(
            &self.search_function(),
            &body,
            NormalizedResult::company_from_raw,
        )
        .await
    }

    async fn search_people(
        &self,
        filters: &PeopleFilters,
        page: PageRequest,
    ) -> Result<SearchPage> {
        let body = Self::to_search_body("people_search", filters, page);
        self.call_search(
            &self.search_function(),
            &body,
            NormalizedResult::person_from_raw,
        )
        .await
    }

    async fn similarity_search(
        &self,
        request: &SimilarityRequest,
        page: PageRequest,
    ) -> Result<SearchPage> {
        if !self.provider.supports_similarity() {
            return Err(ProspectError::Unsupported {
                provider: self.provider,
                operation: "similarity search",
            });
        }
        let body = Self::to_search_body("similarity_search", request, page);
        self.call_search(
            &self.similarity_function(),
            &body,
            NormalizedResult::company_from_raw,
        )
        .await
    }

    async fn import(&self, request: &ImportRequest) -> Result<ImportOutcome> {
        let response = self
            .backend
            .invoke(&self.import_function(), request)
            .await
            .map_err(|e| ProspectError::from_backend(self.provider, e))?;
        import_outcome(&response.body)
    }

    async fn credit_balance(&self) -> Result<Option<f64>> {
        let balance: Option<f64> = self
            .backend
            .rpc("get_credit_balance", &json!({ "p_provider": self.provider }))
            .await
            .map_err(|e| ProspectError::from_backend(self.provider, e))?;
        Ok(balance)
    }

    fn provider(&self) -> Provider {
        self.provider
    }
}

// Edge function request types

#[derive(Debug, Serialize)]
struct SearchBody<'a, F: Serialize> {
    action: &'static str,
    #[serde(flatten)]
    filters: &'a F,
    page: u32,
    per_page: u32,
}
