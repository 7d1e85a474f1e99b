//! Search filter sets.
//!
//! Every dimension is optional. A set with no constraint at all is treated
//! as an invalid query rather than "match everything", so a metered provider
//! is never asked for an unbounded search.

use crate::credits::SearchKind;
use crate::error::{ProspectError, Result};
use serde::{Deserialize, Serialize};

/// Inclusive numeric range with optional bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    /// Upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl Range {
    /// Range with both bounds optional.
    #[must_use]
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    /// Range between two bounds.
    #[must_use]
    pub fn between(min: u64, max: u64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// No bound set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `value` lies in the range.
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => {
                Err(ProspectError::InvalidRange { field, min, max })
            }
            _ => Ok(()),
        }
    }

    fn describe(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(format!("{min}-{max}")),
            (Some(min), None) => Some(format!("{min}+")),
            (None, Some(max)) => Some(format!("up to {max}")),
            (None, None) => None,
        }
    }
}

/// Seniority levels understood by the people search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    /// Owner
    Owner,
    /// Founder
    Founder,
    /// C-level executive
    CSuite,
    /// Partner
    Partner,
    /// Vice president
    Vp,
    /// Head of function
    Head,
    /// Director
    Director,
    /// Manager
    Manager,
    /// Senior individual contributor
    Senior,
    /// Entry level
    Entry,
    /// Intern
    Intern,
}

impl Seniority {
    /// Label for query descriptions.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Founder => "Founder",
            Self::CSuite => "C-Suite",
            Self::Partner => "Partner",
            Self::Vp => "VP",
            Self::Head => "Head",
            Self::Director => "Director",
            Self::Manager => "Manager",
            Self::Senior => "Senior",
            Self::Entry => "Entry",
            Self::Intern => "Intern",
        }
    }
}

/// Filters for company search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFilters {
    /// Industry names
    pub industries: Vec<String>,
    /// Free-form company tags
    pub tags: Vec<String>,
    /// Technologies in the company's stack
    pub technologies: Vec<String>,
    /// Headquarters cities
    pub cities: Vec<String>,
    /// Headquarters countries
    pub countries: Vec<String>,
    /// Employee headcount
    pub employee_count: Range,
    /// Annual revenue in USD
    pub revenue: Range,
    /// Year founded
    pub founded_year: Range,
    /// Free-text keywords
    pub keywords: Option<String>,
    /// Company domains
    pub domains: Vec<String>,
}

impl CompanyFilters {
    /// No dimension constrains the search.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        blank_list(&self.industries)
            && blank_list(&self.tags)
            && blank_list(&self.technologies)
            && blank_list(&self.cities)
            && blank_list(&self.countries)
            && self.employee_count.is_empty()
            && self.revenue.is_empty()
            && self.founded_year.is_empty()
            && blank(self.keywords.as_deref())
            && blank_list(&self.domains)
    }

    fn validate(&self) -> Result<()> {
        self.employee_count.validate("employee_count")?;
        self.revenue.validate("revenue")?;
        self.founded_year.validate("founded_year")
    }

    fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        push_list(&mut parts, "industries", &self.industries);
        push_list(&mut parts, "tags", &self.tags);
        push_list(&mut parts, "technologies", &self.technologies);
        push_list(&mut parts, "cities", &self.cities);
        push_list(&mut parts, "countries", &self.countries);
        if let Some(r) = self.employee_count.describe() {
            parts.push(format!("{r} employees"));
        }
        if let Some(r) = self.revenue.describe() {
            parts.push(format!("revenue {r} USD"));
        }
        if let Some(r) = self.founded_year.describe() {
            parts.push(format!("founded {r}"));
        }
        push_keywords(&mut parts, self.keywords.as_deref());
        push_list(&mut parts, "domains", &self.domains);
        parts
    }
}

/// Filters for people search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleFilters {
    /// Job titles
    pub job_titles: Vec<String>,
    /// Seniority levels
    pub seniority_levels: Vec<Seniority>,
    /// Cities
    pub cities: Vec<String>,
    /// Countries
    pub countries: Vec<String>,
    /// Employer domains
    pub domains: Vec<String>,
    /// Free-text keywords
    pub keywords: Option<String>,
}

impl PeopleFilters {
    /// No dimension constrains the search.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        blank_list(&self.job_titles)
            && self.seniority_levels.is_empty()
            && blank_list(&self.cities)
            && blank_list(&self.countries)
            && blank_list(&self.domains)
            && blank(self.keywords.as_deref())
    }

    fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        push_list(&mut parts, "titles", &self.job_titles);
        let seniority: Vec<String> = self
            .seniority_levels
            .iter()
            .map(|s| s.label().to_string())
            .collect();
        push_list(&mut parts, "seniority", &seniority);
        push_list(&mut parts, "cities", &self.cities);
        push_list(&mut parts, "countries", &self.countries);
        push_list(&mut parts, "domains", &self.domains);
        push_keywords(&mut parts, self.keywords.as_deref());
        parts
    }
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Whitespace-only entries do not constrain a search.
fn blank_list(values: &[String]) -> bool {
    values.iter().all(|v| v.trim().is_empty())
}

fn push_list(parts: &mut Vec<String>, label: &str, values: &[String]) {
    let values: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();
    if !values.is_empty() {
        parts.push(format!("{label} {}", values.join(", ")));
    }
}

fn push_keywords(parts: &mut Vec<String>, keywords: Option<&str>) {
    if let Some(k) = keywords.map(str::trim).filter(|k| !k.is_empty()) {
        parts.push(format!("keywords \"{k}\""));
    }
}

/// Filters for one search, company or people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchFilterSet {
    /// Company search
    Company(CompanyFilters),
    /// People search
    People(PeopleFilters),
}

impl SearchFilterSet {
    /// Empty company filter set.
    #[must_use]
    pub fn company() -> Self {
        Self::Company(CompanyFilters::default())
    }

    /// Empty people filter set.
    #[must_use]
    pub fn people() -> Self {
        Self::People(PeopleFilters::default())
    }

    /// Search kind these filters drive.
    #[must_use]
    pub fn kind(&self) -> SearchKind {
        match self {
            Self::Company(_) => SearchKind::Company,
            Self::People(_) => SearchKind::People,
        }
    }

    /// No dimension constrains the search.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Company(f) => f.is_empty(),
            Self::People(f) => f.is_empty(),
        }
    }

    /// Check the filters can be sent.
    ///
    /// # Errors
    /// `EmptyFilters` for an unconstrained set, `InvalidRange` for inverted ranges.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ProspectError::EmptyFilters);
        }
        match self {
            Self::Company(f) => f.validate(),
            Self::People(_) => Ok(()),
        }
    }

    /// Human-readable description, used to label imported tables.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts = match self {
            Self::Company(f) => f.describe(),
            Self::People(f) => f.describe(),
        };
        if parts.is_empty() {
            format!("{} (no filters)", self.kind().label())
        } else {
            format!("{}: {}", self.kind().label(), parts.join("; "))
        }
    }

    /// Replace the location dimensions.
    pub fn set_locations(&mut self, cities: Vec<String>, countries: Vec<String>) {
        match self {
            Self::Company(f) => {
                f.cities = cities;
                f.countries = countries;
            }
            Self::People(f) => {
                f.cities = cities;
                f.countries = countries;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sets() {
        assert!(SearchFilterSet::company().is_empty());
        assert!(SearchFilterSet::people().is_empty());

        let filters = SearchFilterSet::Company(CompanyFilters {
            keywords: Some("   ".to_string()),
            employee_count: Range::default(),
            ..CompanyFilters::default()
        });
        assert!(filters.is_empty());
        assert!(matches!(
            filters.validate(),
            Err(ProspectError::EmptyFilters)
        ));
    }

    #[test]
    fn test_blank_list_entries_are_empty() {
        let filters = SearchFilterSet::Company(CompanyFilters {
            industries: vec![" ".to_string()],
            domains: vec![String::new(), "\t".to_string()],
            ..CompanyFilters::default()
        });
        assert!(filters.is_empty());
        assert!(matches!(
            filters.validate(),
            Err(ProspectError::EmptyFilters)
        ));

        let filters = SearchFilterSet::People(PeopleFilters {
            job_titles: vec!["  ".to_string()],
            ..PeopleFilters::default()
        });
        assert!(filters.is_empty());

        let filters = SearchFilterSet::Company(CompanyFilters {
            industries: vec![" ".to_string(), "SaaS".to_string()],
            ..CompanyFilters::default()
        });
        assert!(!filters.is_empty());
        assert_eq!(filters.describe(), "Companies: industries SaaS");
    }

    #[test]
    fn test_single_dimension_is_enough() {
        let filters = SearchFilterSet::Company(CompanyFilters {
            founded_year: Range::new(Some(2015), None),
            ..CompanyFilters::default()
        });
        assert!(!filters.is_empty());
        assert!(filters.validate().is_ok());

        let filters = SearchFilterSet::People(PeopleFilters {
            seniority_levels: vec![Seniority::Vp],
            ..PeopleFilters::default()
        });
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filters = SearchFilterSet::Company(CompanyFilters {
            employee_count: Range::between(500, 50),
            ..CompanyFilters::default()
        });
        let err = filters.validate().unwrap_err();
        assert!(matches!(
            err,
            ProspectError::InvalidRange {
                field: "employee_count",
                ..
            }
        ));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::between(10, 50);
        assert!(range.contains(10));
        assert!(range.contains(50));
        assert!(!range.contains(51));
        assert!(Range::default().contains(u64::MAX));
    }

    #[test]
    fn test_describe() {
        let filters = SearchFilterSet::Company(CompanyFilters {
            industries: vec!["SaaS".to_string(), "Fintech".to_string()],
            countries: vec!["Germany".to_string()],
            employee_count: Range::between(50, 200),
            keywords: Some(" payroll ".to_string()),
            ..CompanyFilters::default()
        });
        assert_eq!(
            filters.describe(),
            "Companies: industries SaaS, Fintech; countries Germany; 50-200 employees; keywords \"payroll\""
        );

        let people = SearchFilterSet::People(PeopleFilters {
            job_titles: vec!["Head of Sales".to_string()],
            seniority_levels: vec![Seniority::Director, Seniority::Vp],
            ..PeopleFilters::default()
        });
        assert_eq!(
            people.describe(),
            "People: titles Head of Sales; seniority Director, VP"
        );
    }

    #[test]
    fn test_serde_tagging() {
        let filters = SearchFilterSet::People(PeopleFilters {
            job_titles: vec!["CTO".to_string()],
            seniority_levels: vec![Seniority::CSuite],
            ..PeopleFilters::default()
        });
        let json = serde_json::to_value(&filters).expect("serialize filters");
        assert_eq!(json["kind"], "people");
        assert_eq!(json["seniority_levels"][0], "c_suite");

        let parsed: SearchFilterSet = serde_json::from_value(json).expect("deserialize filters");
        assert_eq!(parsed, filters);
    }

    #[test]
    fn test_set_locations() {
        let mut filters = SearchFilterSet::people();
        filters.set_locations(vec!["Berlin".to_string()], vec!["Germany".to_string()]);
        assert!(!filters.is_empty());
        assert!(filters.describe().contains("cities Berlin"));
    }
}
