//! Keel Prospect - credit-aware lead search over third-party providers.
//!
//! This crate drives the prospecting wizard: build a filter set, look at a
//! small preview, pull full pages, pick rows, and import them into a table.
//!
//! # Features
//!
//! - **Filters and pickers**: company and people filter sets, location
//!   picker with trade-zone chips
//! - **Credit accounting**: flat per-provider estimates and a running total
//!   that only grows until reset
//! - **Pure state machine**: every transition goes through [`reduce`]
//! - **Async controller**: one call at a time, late responses dropped after
//!   close
//!
//! # Example
//!
//! ```rust,ignore
//! use keel_prospect::{
//!     HttpSearchService, Provider, SearchFilterSet, WizardController, WizardLimits, WizardQuery,
//! };
//! use std::sync::Arc;
//!
//! let service = Arc::new(HttpSearchService::new(backend, Provider::AiArk));
//! let wizard = WizardController::new(
//!     service,
//!     Arc::new(TracingNotifier),
//!     WizardQuery::Filters(filters),
//!     WizardLimits::default(),
//! );
//! wizard.search().await?;
//! wizard.pull_full().await?;
//! let navigation = wizard.import(None).await?;
//! println!("Open {}", navigation.path);
//! ```
//!
//! # Flow
//!
//! ```text
//! Input --search--> Preview --pull--> Results --load more--> Results
//!   ^                  |                 |
//!   +------back--------+<-----back-------+        import -> /tables/{id}
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod controller;
pub mod credits;
pub mod error;
pub mod filters;
pub mod icp;
pub mod picker;
pub mod providers;
pub mod reference;
pub mod result;
pub mod selection;
pub mod service;
pub mod similarity;
pub mod wizard;

// Re-export main types
pub use controller::{Navigation, Operation, WizardController, INTEGRATIONS_SETTINGS_PATH};
pub use credits::{estimate, CreditCounter, CreditWidget, Provider, SearchKind};
pub use error::{ProspectError, Result};
pub use filters::{CompanyFilters, PeopleFilters, Range, SearchFilterSet, Seniority};
pub use icp::{BackendIcpStore, IcpProfile, IcpStore, MemoryIcpStore};
pub use picker::{industry_picker, technology_picker, LocationPicker, LocationValue, MultiSelect};
pub use providers::HttpSearchService;
pub use reference::{trade_zone, TradeZone};
pub use result::{CompanyResult, NormalizedResult, Pagination, PersonResult, ResultId, SearchPage};
pub use selection::SelectionSet;
pub use service::{ImportOutcome, ImportRequest, PageRequest, SearchService};
pub use similarity::{normalize_domain, SimilarityInput, SimilarityRequest};
pub use wizard::{reduce, WizardEvent, WizardLimits, WizardQuery, WizardState, WizardStep};
