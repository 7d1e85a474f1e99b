//! Normalized search results.
//!
//! Providers return loosely shaped JSON rows. Parsing here is explicit:
//! each field is looked up under the names providers use for it, and a row
//! without an identifier is rejected rather than given a blank key.

use crate::error::{ProspectError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Provider-side identifier of a result row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    /// Wrap a non-blank identifier.
    ///
    /// # Errors
    /// `Decode` if the identifier is blank.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ProspectError::Decode("result identifier is blank".to_string()));
        }
        Ok(Self(id))
    }

    /// Get as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResultId {
    /// Test and fixture convenience; blank input is not checked.
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A company row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyResult {
    /// Identifier used for selection and import
    pub ai_ark_id: ResultId,
    /// Company name
    pub name: String,
    /// Primary domain
    pub domain: Option<String>,
    /// Website URL
    pub website: Option<String>,
    /// Industry
    pub industry: Option<String>,
    /// Headquarters location
    pub location: Option<String>,
    /// Employee headcount
    pub employee_count: Option<u64>,
    /// LinkedIn page
    pub linkedin_url: Option<String>,
}

/// A person row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonResult {
    /// Identifier used for selection and import
    pub ai_ark_id: ResultId,
    /// Full name
    pub full_name: String,
    /// Job title
    pub title: Option<String>,
    /// Employer name
    pub company_name: Option<String>,
    /// Employer domain
    pub company_domain: Option<String>,
    /// Location
    pub location: Option<String>,
    /// Seniority as reported by the provider
    pub seniority: Option<String>,
    /// LinkedIn profile
    pub linkedin_url: Option<String>,
}

/// One result row of either kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedResult {
    /// Company row
    Company(CompanyResult),
    /// Person row
    Person(PersonResult),
}

impl NormalizedResult {
    /// Identifier of the row.
    #[must_use]
    pub fn id(&self) -> &ResultId {
        match self {
            Self::Company(c) => &c.ai_ark_id,
            Self::Person(p) => &p.ai_ark_id,
        }
    }

    /// Primary label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Company(c) => &c.name,
            Self::Person(p) => &p.full_name,
        }
    }

    /// Secondary line: domain and industry for companies, title at
    /// employer for people.
    #[must_use]
    pub fn subtitle(&self) -> Option<String> {
        match self {
            Self::Company(c) => {
                let parts: Vec<&str> = [c.domain.as_deref(), c.industry.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect();
                (!parts.is_empty()).then(|| parts.join(" · "))
            }
            Self::Person(p) => match (p.title.as_deref(), p.company_name.as_deref()) {
                (Some(title), Some(company)) => Some(format!("{title} at {company}")),
                (Some(title), None) => Some(title.to_string()),
                (None, Some(company)) => Some(company.to_string()),
                (None, None) => None,
            },
        }
    }

    /// Parse a raw company row.
    ///
    /// # Errors
    /// `Decode` if the row is not an object or has no identifier or name.
    pub fn company_from_raw(raw: &Value) -> Result<Self> {
        let row = as_object(raw)?;
        let ai_ark_id = id_field(row)?;
        let name = text(row, &["name", "company_name"])
            .ok_or_else(|| missing("name", &ai_ark_id))?;

        Ok(Self::Company(CompanyResult {
            ai_ark_id,
            name,
            domain: text(row, &["domain", "primary_domain"]),
            website: text(row, &["website", "website_url"]),
            industry: text(row, &["industry"]),
            location: location(row),
            employee_count: number(row, &["employee_count", "employees", "headcount"]),
            linkedin_url: text(row, &["linkedin_url", "linkedin"]),
        }))
    }

    /// Parse a raw person row.
    ///
    /// # Errors
    /// `Decode` if the row is not an object or has no identifier or name.
    pub fn person_from_raw(raw: &Value) -> Result<Self> {
        let row = as_object(raw)?;
        let ai_ark_id = id_field(row)?;
        let full_name = text(row, &["full_name", "name"])
            .or_else(|| {
                let first = text(row, &["first_name"]);
                let last = text(row, &["last_name"]);
                match (first, last) {
                    (Some(f), Some(l)) => Some(format!("{f} {l}")),
                    (Some(n), None) | (None, Some(n)) => Some(n),
                    (None, None) => None,
                }
            })
            .ok_or_else(|| missing("full_name", &ai_ark_id))?;

        Ok(Self::Person(PersonResult {
            ai_ark_id,
            full_name,
            title: text(row, &["title", "job_title"]),
            company_name: text(row, &["company_name", "organization_name"]),
            company_domain: text(row, &["company_domain", "organization_domain"]),
            location: location(row),
            seniority: text(row, &["seniority"]),
            linkedin_url: text(row, &["linkedin_url", "linkedin"]),
        }))
    }
}

/// Pagination metadata of one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based page index
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// Total matching rows
    pub total: u64,
    /// Total pages, zero when the provider does not report it
    pub total_pages: u32,
    /// Rows in this page
    pub returned: u32,
}

impl Pagination {
    /// Parse the `pagination` object of a response body.
    ///
    /// Missing fields default to zero; `returned` is taken from the actual
    /// row count since providers disagree on whether they report it.
    #[must_use]
    pub fn from_raw(raw: Option<&Value>, returned: usize) -> Self {
        let get = |key: &str| raw.and_then(|p| p.get(key)).and_then(Value::as_u64);
        let to_u32 = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
        Self {
            page: get("page").map_or(0, to_u32),
            per_page: get("per_page").or_else(|| get("size")).map_or(0, to_u32),
            total: get("total").or_else(|| get("total_count")).unwrap_or(0),
            total_pages: get("total_pages").map_or(0, to_u32),
            returned: u32::try_from(returned).unwrap_or(u32::MAX),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Rows in provider order
    pub results: Vec<NormalizedResult>,
    /// Pagination metadata
    pub pagination: Pagination,
    /// Credits billed for the call
    pub credits_consumed: f64,
}

impl SearchPage {
    /// Parse a response body whose rows live under `results`.
    ///
    /// # Errors
    /// `Decode` if `results` is missing or any row fails to parse.
    pub fn from_body(
        body: &Value,
        parse_row: fn(&Value) -> Result<NormalizedResult>,
        credits_consumed: f64,
    ) -> Result<Self> {
        let rows = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| ProspectError::Decode("response has no results array".to_string()))?;

        let results = rows.iter().map(parse_row).collect::<Result<Vec<_>>>()?;
        let pagination = Pagination::from_raw(body.get("pagination"), results.len());

        Ok(Self {
            results,
            pagination,
            credits_consumed,
        })
    }
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>> {
    raw.as_object()
        .ok_or_else(|| ProspectError::Decode(format!("expected an object row, got {raw}")))
}

fn id_field(row: &Map<String, Value>) -> Result<ResultId> {
    let id = ["ai_ark_id", "id"].iter().find_map(|key| match row.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    });
    match id {
        Some(id) => ResultId::new(id),
        None => Err(ProspectError::Decode("row has no identifier".to_string())),
    }
}

fn missing(field: &str, id: &ResultId) -> ProspectError {
    ProspectError::Decode(format!("row {id} has no {field}"))
}

fn text(row: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        row.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    })
}

fn number(row: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match row.get(*key) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn location(row: &Map<String, Value>) -> Option<String> {
    if let Some(loc) = text(row, &["location"]) {
        return Some(loc);
    }
    let parts: Vec<String> = [text(row, &["city"]), text(row, &["country"])]
        .into_iter()
        .flatten()
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_company_row() {
        let row = json!({
            "id": "co_1",
            "name": "Acme",
            "domain": "acme.io",
            "industry": "SaaS",
            "city": "Berlin",
            "country": "Germany",
            "employees": "120"
        });
        let result = NormalizedResult::company_from_raw(&row).expect("valid row");
        assert_eq!(result.id().as_str(), "co_1");
        assert_eq!(result.display_name(), "Acme");
        assert_eq!(result.subtitle().as_deref(), Some("acme.io · SaaS"));
        let NormalizedResult::Company(company) = result else {
            panic!("expected company");
        };
        assert_eq!(company.location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(company.employee_count, Some(120));
    }

    #[test]
    fn test_person_row_name_fallback() {
        let row = json!({
            "ai_ark_id": 42,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "title": "CTO",
            "company_name": "Analytical Engines"
        });
        let result = NormalizedResult::person_from_raw(&row).expect("valid row");
        assert_eq!(result.id().as_str(), "42");
        assert_eq!(result.display_name(), "Ada Lovelace");
        assert_eq!(
            result.subtitle().as_deref(),
            Some("CTO at Analytical Engines")
        );
    }

    #[test]
    fn test_row_without_id_is_rejected() {
        let row = json!({ "name": "Nameless", "id": "  " });
        assert!(matches!(
            NormalizedResult::company_from_raw(&row),
            Err(ProspectError::Decode(_))
        ));
        assert!(NormalizedResult::person_from_raw(&json!("not a row")).is_err());
    }

    #[test]
    fn test_row_without_name_is_rejected() {
        let row = json!({ "id": "p_1", "title": "CEO" });
        let err = NormalizedResult::person_from_raw(&row).unwrap_err();
        assert_eq!(err.to_string(), "malformed response: row p_1 has no full_name");
    }

    #[test]
    fn test_page_from_body() {
        let body = json!({
            "results": [
                { "id": "a", "name": "A" },
                { "id": "b", "name": "B" }
            ],
            "pagination": { "page": 0, "per_page": 5, "total": 47, "total_pages": 10 }
        });
        let page = SearchPage::from_body(&body, NormalizedResult::company_from_raw, 0.5)
            .expect("valid body");
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.pagination.total, 47);
        assert_eq!(page.pagination.returned, 2);
        assert!((page.credits_consumed - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_page_one_bad_row_fails_whole_page() {
        let body = json!({ "results": [ { "id": "a", "name": "A" }, { "name": "B" } ] });
        assert!(SearchPage::from_body(&body, NormalizedResult::company_from_raw, 0.0).is_err());
        assert!(SearchPage::from_body(&json!({}), NormalizedResult::company_from_raw, 0.0).is_err());
    }
}
