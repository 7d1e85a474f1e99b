//! Lookalike-company search from seed domains.

use crate::credits::SearchKind;
use crate::error::{ProspectError, Result};
use crate::filters::Range;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// Fewest seed domains a similarity search accepts.
pub const MIN_SEEDS: usize = 1;

/// Default upper bound on seed domains.
pub const DEFAULT_MAX_SEEDS: usize = 5;

/// Reduce user input to a bare lowercase host.
///
/// Accepts `acme.io`, `https://www.Acme.io/about`, `acme.io:8080` and so
/// on. The scheme, port, path, and a leading `www.` are dropped.
///
/// # Errors
/// `InvalidSeedDomains` if no hostname with a dot can be extracted.
pub fn normalize_domain(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ProspectError::InvalidSeedDomains(
            "empty domain".to_string(),
        ));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| ProspectError::InvalidSeedDomains(format!("'{trimmed}': {e}")))?;

    let host = match url.host() {
        Some(Host::Domain(host)) => host.to_ascii_lowercase(),
        _ => {
            return Err(ProspectError::InvalidSeedDomains(format!(
                "'{trimmed}' is not a domain"
            )))
        }
    };

    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if !host.contains('.') || host.starts_with('.') || host.ends_with('.') {
        return Err(ProspectError::InvalidSeedDomains(format!(
            "'{trimmed}' is not a domain"
        )));
    }
    Ok(host)
}

/// What the user typed into the similarity form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityInput {
    /// Seed domains or URLs, as typed
    pub seeds: Vec<String>,
    /// CRM account the search is run for
    pub account_id: Option<String>,
    /// Restrict lookalikes to these industries
    pub industries: Vec<String>,
    /// Restrict lookalikes by headcount
    pub employee_count: Range,
    /// Restrict lookalikes by country
    pub countries: Vec<String>,
}

impl SimilarityInput {
    /// Input seeded with domains.
    #[must_use]
    pub fn from_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether at least one seed has been typed.
    #[must_use]
    pub fn has_seeds(&self) -> bool {
        self.seeds.iter().any(|s| !s.trim().is_empty())
    }

    /// Validate and normalize into a request.
    ///
    /// # Errors
    /// `InvalidSeedDomains` for a bad domain or a seed count outside
    /// `MIN_SEEDS..=max_seeds` after deduplication.
    pub fn to_request(&self, max_seeds: usize) -> Result<SimilarityRequest> {
        let mut domains: Vec<String> = Vec::new();
        for seed in self.seeds.iter().filter(|s| !s.trim().is_empty()) {
            let domain = normalize_domain(seed)?;
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }

        if domains.len() < MIN_SEEDS {
            return Err(ProspectError::InvalidSeedDomains(
                "at least one seed domain is required".to_string(),
            ));
        }
        if domains.len() > max_seeds {
            return Err(ProspectError::InvalidSeedDomains(format!(
                "at most {max_seeds} seed domains are allowed, got {}",
                domains.len()
            )));
        }

        if let (Some(min), Some(max)) = (self.employee_count.min, self.employee_count.max) {
            if min > max {
                return Err(ProspectError::InvalidRange {
                    field: "employee_count",
                    min,
                    max,
                });
            }
        }

        Ok(SimilarityRequest {
            domains,
            account_id: self.account_id.clone().filter(|a| !a.trim().is_empty()),
            industries: self.industries.clone(),
            employee_count: self.employee_count,
            countries: self.countries.clone(),
        })
    }

    /// Human-readable description, used to label imported tables.
    #[must_use]
    pub fn describe(&self) -> String {
        let seeds: Vec<&str> = self
            .seeds
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        format!("{} like {}", SearchKind::Similarity.label(), seeds.join(", "))
    }
}

/// Normalized body of a similarity search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRequest {
    /// Deduplicated lowercase seed hosts
    pub domains: Vec<String>,
    /// CRM account the search is run for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Industry restriction
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub industries: Vec<String>,
    /// Headcount restriction
    #[serde(skip_serializing_if = "Range::is_empty")]
    pub employee_count: Range,
    /// Country restriction
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<String>,
}
