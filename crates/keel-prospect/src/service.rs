//! Search service trait and request/response types.

use crate::credits::{Provider, SearchKind};
use crate::error::Result;
use crate::filters::{CompanyFilters, PeopleFilters, SearchFilterSet};
use crate::result::{ResultId, SearchPage};
use crate::similarity::SimilarityRequest;
use async_trait::async_trait;
use keel_core::RecordId;
use serde::{Deserialize, Serialize};

/// Page index and size of one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u32,
    /// Rows per page
    pub per_page: u32,
}

impl PageRequest {
    /// Page `page` of size `per_page`.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// First page of size `per_page`.
    #[must_use]
    pub fn first(per_page: u32) -> Self {
        Self::new(0, per_page)
    }
}

/// Materialize selected rows into a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    /// What the rows are
    pub kind: SearchKind,
    /// Selected identifiers, in load order
    pub ai_ark_ids: Vec<ResultId>,
    /// Human-readable description of the search
    pub query_description: String,
    /// Name for the created table; the backend picks one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

/// Created table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Identifier of the new table
    pub table_id: RecordId,
    /// Rows written
    pub row_count: u64,
}

/// Lead-search provider as seen by the wizard.
///
/// Implementations must be thread-safe (Send + Sync); the wizard holds
/// them behind an `Arc`.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Search companies.
    ///
    /// # Errors
    /// Returns error if the provider rejects the call, is not configured,
    /// or returns a malformed page.
    async fn search_companies(
        &self,
        filters: &CompanyFilters,
        page: PageRequest,
    ) -> Result<SearchPage>;

    /// Search people.
    ///
    /// # Errors
    /// As for [`SearchService::search_companies`].
    async fn search_people(&self, filters: &PeopleFilters, page: PageRequest)
        -> Result<SearchPage>;

    /// Find companies resembling the seed domains.
    ///
    /// # Errors
    /// `Unsupported` if the provider has no lookalike search, otherwise as
    /// for [`SearchService::search_companies`].
    async fn similarity_search(
        &self,
        request: &SimilarityRequest,
        page: PageRequest,
    ) -> Result<SearchPage>;

    /// Materialize selected rows into a table.
    ///
    /// # Errors
    /// Returns error if the provider or backend rejects the import.
    async fn import(&self, request: &ImportRequest) -> Result<ImportOutcome>;

    /// Current credit balance, `None` when the provider does not report one.
    ///
    /// # Errors
    /// Returns error if the balance lookup fails.
    async fn credit_balance(&self) -> Result<Option<f64>>;

    /// Provider behind this service.
    fn provider(&self) -> Provider;

    /// Dispatch a filter set to the matching search.
    ///
    /// # Errors
    /// As for the underlying search.
    async fn search(&self, filters: &SearchFilterSet, page: PageRequest) -> Result<SearchPage> {
        match filters {
            SearchFilterSet::Company(f) => self.search_companies(f, page).await,
            SearchFilterSet::People(f) => self.search_people(f, page).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_request_serialization() {
        let request = ImportRequest {
            kind: SearchKind::People,
            ai_ark_ids: vec![ResultId::from("p1"), ResultId::from("p2")],
            query_description: "People: titles CTO".to_string(),
            table_name: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "people");
        assert_eq!(json["ai_ark_ids"], serde_json::json!(["p1", "p2"]));
        assert!(json.get("table_name").is_none());
    }

    #[test]
    fn test_page_request() {
        assert_eq!(PageRequest::first(25), PageRequest::new(0, 25));
    }
}
