//! Filter sub-pickers.
//!
//! Each picker keeps a local text query for search-as-you-type against a
//! small in-memory list and returns its committed value from every mutation
//! so the owner can fold it into the filter set. Nothing is persisted.

use crate::error::{ProspectError, Result};
use crate::reference::{self, TradeZone};
use serde::Serialize;

/// Default number of suggestions shown for a query.
pub const SUGGESTION_LIMIT: usize = 8;

/// Multi-select over a reference list with free-text filtering.
#[derive(Debug, Clone)]
pub struct MultiSelect {
    options: Vec<String>,
    query: String,
    selected: Vec<String>,
    limit: usize,
}

impl MultiSelect {
    /// Picker over `options`.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            query: String::new(),
            selected: Vec::new(),
            limit: SUGGESTION_LIMIT,
        }
    }

    /// Start with an existing selection.
    #[must_use]
    pub fn with_selected(mut self, selected: Vec<String>) -> Self {
        self.selected = selected;
        self
    }

    /// Change how many suggestions are returned.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Update the search text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Current search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Options containing the query, case-insensitively, up to the limit.
    pub fn suggestions(&self) -> Vec<&str> {
        let needle = self.query.trim().to_lowercase();
        self.options
            .iter()
            .filter(|opt| needle.is_empty() || opt.to_lowercase().contains(&needle))
            .take(self.limit)
            .map(String::as_str)
            .collect()
    }

    /// Whether `value` is selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|s| s == value)
    }

    /// Flip membership of `value`; returns whether it is now selected.
    ///
    /// Values outside the option list are accepted, so users can enter
    /// entries the built-in list lacks.
    pub fn toggle(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        if let Some(pos) = self.selected.iter().position(|s| s == value) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(value.to_string());
            true
        }
    }

    /// Ensure `value` is selected.
    pub fn insert(&mut self, value: &str) {
        if !self.is_selected(value) {
            self.selected.push(value.to_string());
        }
    }

    /// Ensure `value` is not selected.
    pub fn remove(&mut self, value: &str) {
        self.selected.retain(|s| s != value);
    }

    /// Drop the whole selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Committed value, in selection order.
    pub fn value(&self) -> &[String] {
        &self.selected
    }
}

/// Picker over built-in industries.
#[must_use]
pub fn industry_picker() -> MultiSelect {
    MultiSelect::new(reference::INDUSTRIES.iter().copied())
}

/// Picker over built-in technologies.
#[must_use]
pub fn technology_picker() -> MultiSelect {
    MultiSelect::new(reference::TECHNOLOGIES.iter().copied())
}

/// Committed value of the location picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationValue {
    /// Selected cities
    pub cities: Vec<String>,
    /// Selected countries
    pub countries: Vec<String>,
}

/// Cities, countries, and trade-zone chips.
///
/// A zone's selected state is derived each time from whether all of its
/// member countries are selected; it is never stored.
#[derive(Debug, Clone)]
pub struct LocationPicker {
    cities: MultiSelect,
    countries: MultiSelect,
    query: String,
}

impl Default for LocationPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationPicker {
    /// Picker over the built-in city and country lists.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cities: MultiSelect::new(reference::CITIES.iter().copied()),
            countries: MultiSelect::new(reference::COUNTRIES.iter().copied()),
            query: String::new(),
        }
    }

    /// Start from an existing value.
    #[must_use]
    pub fn with_value(mut self, value: LocationValue) -> Self {
        self.cities = self.cities.with_selected(value.cities);
        self.countries = self.countries.with_selected(value.countries);
        self
    }

    /// Update the search text for all three lists.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.cities.set_query(query.clone());
        self.countries.set_query(query.clone());
        self.query = query;
    }

    /// Matching city suggestions.
    pub fn city_suggestions(&self) -> Vec<&str> {
        self.cities.suggestions()
    }

    /// Matching country suggestions.
    pub fn country_suggestions(&self) -> Vec<&str> {
        self.countries.suggestions()
    }

    /// Trade zones whose name contains the query.
    pub fn zone_suggestions(&self) -> Vec<&'static TradeZone> {
        let needle = self.query.trim().to_lowercase();
        reference::TRADE_ZONES
            .iter()
            .filter(|z| needle.is_empty() || z.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Flip one city.
    pub fn toggle_city(&mut self, city: &str) -> LocationValue {
        self.cities.toggle(city);
        self.value()
    }

    /// Flip one country.
    pub fn toggle_country(&mut self, country: &str) -> LocationValue {
        self.countries.toggle(country);
        self.value()
    }

    /// Whether every member country of the zone is selected.
    pub fn is_zone_selected(&self, zone: &str) -> bool {
        reference::trade_zone(zone).is_some_and(|z| {
            z.countries
                .iter()
                .all(|country| self.countries.is_selected(country))
        })
    }

    /// Select every member of a zone, or deselect them all if the zone is
    /// already fully selected.
    ///
    /// # Errors
    /// `Validation` if the zone is unknown.
    pub fn toggle_zone(&mut self, zone: &str) -> Result<LocationValue> {
        let found = reference::trade_zone(zone)
            .ok_or_else(|| ProspectError::Validation(format!("unknown trade zone '{zone}'")))?;

        if self.is_zone_selected(found.name) {
            for country in found.countries {
                self.countries.remove(country);
            }
        } else {
            for country in found.countries {
                self.countries.insert(country);
            }
        }
        Ok(self.value())
    }

    /// Committed value.
    pub fn value(&self) -> LocationValue {
        LocationValue {
            cities: self.cities.value().to_vec(),
            countries: self.countries.value().to_vec(),
        }
    }
}
