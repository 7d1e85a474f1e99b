//! Credit estimation and session accounting.
//!
//! Costs are flat per provider and search kind; there is no dynamic pricing
//! and no round trip to estimate a call.

use crate::error::ProspectError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Third-party lead-search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// AI Ark company/people/similarity search
    AiArk,
    /// Apollo people and organization search
    Apollo,
    /// Explorium business and prospect search
    Explorium,
}

impl Provider {
    /// Human-readable provider name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AiArk => "AI Ark",
            Self::Apollo => "Apollo",
            Self::Explorium => "Explorium",
        }
    }

    /// Slug used in edge-function names, e.g. `ai-ark`.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::AiArk => "ai-ark",
            Self::Apollo => "apollo",
            Self::Explorium => "explorium",
        }
    }

    /// Whether the provider offers lookalike search from seed domains.
    #[must_use]
    pub fn supports_similarity(&self) -> bool {
        matches!(self, Self::AiArk)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ai_ark" | "aiark" => Ok(Self::AiArk),
            "apollo" => Ok(Self::Apollo),
            "explorium" => Ok(Self::Explorium),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// What a search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// Companies matching firmographic filters
    Company,
    /// People matching role and location filters
    People,
    /// Companies resembling seed domains
    Similarity,
}

impl SearchKind {
    /// Label used in query descriptions.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Company => "Companies",
            Self::People => "People",
            Self::Similarity => "Lookalike companies",
        }
    }
}

/// Flat credit cost of one search call.
#[must_use]
pub fn estimate(provider: Provider, kind: SearchKind) -> f64 {
    match (provider, kind) {
        (Provider::AiArk, SearchKind::Company | SearchKind::Similarity) => 0.5,
        (Provider::AiArk, SearchKind::People) => 2.5,
        (Provider::Apollo | Provider::Explorium, _) => 1.0,
    }
}

/// Running total of credits consumed during one wizard lifetime.
///
/// Only grows; negative or non-finite amounts are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditCounter {
    total: f64,
    calls: u32,
}

impl CreditCounter {
    /// A counter with nothing consumed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter after one more billed call.
    #[must_use]
    pub fn add(self, consumed: f64) -> Self {
        let consumed = if consumed.is_finite() && consumed > 0.0 {
            consumed
        } else {
            0.0
        };
        Self {
            total: self.total + consumed,
            calls: self.calls + 1,
        }
    }

    /// Credits consumed so far.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of billed calls so far.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

/// Balance and cost shown next to a search action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditWidget {
    /// Current balance, `None` while it is being fetched
    pub balance: Option<f64>,
    /// Estimated cost of the next action
    pub estimate: f64,
}

impl CreditWidget {
    /// Widget for the next call of `kind` against `provider`.
    #[must_use]
    pub fn new(balance: Option<f64>, provider: Provider, kind: SearchKind) -> Self {
        Self {
            balance,
            estimate: estimate(provider, kind),
        }
    }

    /// Whether the action button is enabled.
    ///
    /// An unknown balance does not block the action; the provider meters it.
    #[must_use]
    pub fn can_afford(&self) -> bool {
        self.balance.map_or(true, |b| b >= self.estimate)
    }

    /// Balance left after the estimated call.
    #[must_use]
    pub fn remaining_after(&self) -> Option<f64> {
        self.balance.map(|b| b - self.estimate)
    }

    /// Reject the call when a known balance does not cover the estimate.
    ///
    /// # Errors
    /// `InsufficientCredits` if the balance is known and too low.
    pub fn ensure_affordable(&self) -> crate::error::Result<()> {
        match self.balance {
            Some(balance) if balance < self.estimate => Err(ProspectError::InsufficientCredits {
                balance,
                estimate: self.estimate,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_cheaper_than_people() {
        assert!(
            estimate(Provider::AiArk, SearchKind::Company)
                < estimate(Provider::AiArk, SearchKind::People)
        );
        assert!((estimate(Provider::Apollo, SearchKind::People) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ensure_affordable() {
        let low = CreditWidget::new(Some(1.0), Provider::AiArk, SearchKind::People);
        assert!(matches!(
            low.ensure_affordable(),
            Err(ProspectError::InsufficientCredits { .. })
        ));
        assert!(CreditWidget::new(None, Provider::AiArk, SearchKind::People)
            .ensure_affordable()
            .is_ok());
        assert!(CreditWidget::new(Some(0.5), Provider::AiArk, SearchKind::Company)
            .ensure_affordable()
            .is_ok());
    }

    #[test]
    fn test_counter_accumulates() {
        let counter = CreditCounter::new().add(0.5).add(2.5).add(2.5);
        assert!((counter.total() - 5.5).abs() < f64::EPSILON);
        assert_eq!(counter.calls(), 3);
    }

    #[test]
    fn test_counter_ignores_negative_and_nan() {
        let counter = CreditCounter::new().add(1.0).add(-3.0).add(f64::NAN);
        assert!((counter.total() - 1.0).abs() < f64::EPSILON);
        assert_eq!(counter.calls(), 3);
    }

    #[test]
    fn test_widget_disables_when_short() {
        let widget = CreditWidget::new(Some(2.0), Provider::AiArk, SearchKind::People);
        assert!(!widget.can_afford());
        assert_eq!(widget.remaining_after(), Some(-0.5));

        let widget = CreditWidget::new(Some(2.5), Provider::AiArk, SearchKind::People);
        assert!(widget.can_afford());

        let widget = CreditWidget::new(None, Provider::AiArk, SearchKind::People);
        assert!(widget.can_afford());
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("ai_ark".parse::<Provider>(), Ok(Provider::AiArk));
        assert_eq!("AI-Ark".parse::<Provider>(), Ok(Provider::AiArk));
        assert_eq!("apollo".parse::<Provider>(), Ok(Provider::Apollo));
        assert!("clearbit".parse::<Provider>().is_err());
        assert_eq!(Provider::AiArk.to_string(), "AI Ark");
    }
}
