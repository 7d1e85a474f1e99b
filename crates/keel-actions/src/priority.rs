//! Priority, due-date status, and relative age labels.

use crate::error::ActionParseError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days ahead within which a due date counts as "soon".
pub const DUE_SOON_DAYS: i64 = 3;

/// Action or task priority. Sorts most urgent first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Needs attention now
    Urgent,
    /// High
    High,
    /// Medium, the default
    #[default]
    Medium,
    /// Low
    Low,
}

impl Priority {
    /// Label for badges.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Priority {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" | "critical" => Ok(Self::Urgent),
            "high" => Ok(Self::High),
            "medium" | "normal" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ActionParseError::UnknownPriority(s.to_string())),
        }
    }
}

/// Where a due date stands relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum DueStatus {
    /// Past due
    Overdue,
    /// Due later today
    DueToday,
    /// Due within [`DUE_SOON_DAYS`] days
    DueSoon(i64),
    /// Due later than that
    Upcoming,
    /// No due date
    None,
}

impl DueStatus {
    /// Status of `due` at `now`. Days are counted by UTC calendar date.
    #[must_use]
    pub fn of(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(due) = due else {
            return Self::None;
        };
        if due < now {
            return Self::Overdue;
        }
        let days = (due.date_naive() - now.date_naive()).num_days();
        match days {
            0 => Self::DueToday,
            d if d <= DUE_SOON_DAYS => Self::DueSoon(d),
            _ => Self::Upcoming,
        }
    }

    /// Label for badges; empty without a due date.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Overdue => "Overdue".to_string(),
            Self::DueToday => "Due today".to_string(),
            Self::DueSoon(1) => "Due tomorrow".to_string(),
            Self::DueSoon(days) => format!("Due in {days} days"),
            Self::Upcoming => "Upcoming".to_string(),
            Self::None => String::new(),
        }
    }

    /// Needs attention today or earlier.
    #[must_use]
    pub fn is_pressing(&self) -> bool {
        matches!(self, Self::Overdue | Self::DueToday)
    }
}

/// Short "time since" label: `just now`, `5m ago`, `3h ago`, `2d ago`,
/// then the calendar date after four weeks.
///
/// Timestamps in the future read as `just now`.
#[must_use]
pub fn relative_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if hours < 1 {
        format!("{minutes}m ago")
    } else if days < 1 {
        format!("{hours}h ago")
    } else if days < 28 {
        format!("{days}d ago")
    } else {
        created.format("%b %-d, %Y").to_string()
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
///
/// A bare date means the end of that day in UTC, so a task due "today"
/// is not overdue until the day is over.
///
/// # Errors
/// `InvalidTimestamp` if neither form matches.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ActionParseError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ActionParseError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        parse_timestamp("test", s).unwrap()
    }

    #[test]
    fn test_priority_parsing_and_order() {
        assert_eq!("URGENT".parse::<Priority>(), Ok(Priority::Urgent));
        assert_eq!(" normal ".parse::<Priority>(), Ok(Priority::Medium));
        assert!("whenever".parse::<Priority>().is_err());

        let mut priorities = vec![Priority::Low, Priority::Urgent, Priority::Medium, Priority::High];
        priorities.sort();
        assert_eq!(
            priorities,
            vec![Priority::Urgent, Priority::High, Priority::Medium, Priority::Low]
        );
    }

    #[test]
    fn test_due_status() {
        let now = at("2026-03-10T12:00:00Z");
        assert_eq!(DueStatus::of(None, now), DueStatus::None);
        assert_eq!(DueStatus::of(Some(at("2026-03-10T11:59:00Z")), now), DueStatus::Overdue);
        assert_eq!(DueStatus::of(Some(at("2026-03-10T18:00:00Z")), now), DueStatus::DueToday);
        assert_eq!(DueStatus::of(Some(at("2026-03-11T08:00:00Z")), now), DueStatus::DueSoon(1));
        assert_eq!(DueStatus::of(Some(at("2026-03-13T08:00:00Z")), now), DueStatus::DueSoon(3));
        assert_eq!(DueStatus::of(Some(at("2026-03-14T08:00:00Z")), now), DueStatus::Upcoming);
    }

    #[test]
    fn test_date_only_due_is_end_of_day() {
        let now = at("2026-03-10T22:00:00Z");
        assert_eq!(DueStatus::of(Some(at("2026-03-10")), now), DueStatus::DueToday);
        assert_eq!(DueStatus::of(Some(at("2026-03-09")), now), DueStatus::Overdue);
    }

    #[test]
    fn test_due_labels() {
        assert_eq!(DueStatus::DueSoon(1).label(), "Due tomorrow");
        assert_eq!(DueStatus::DueSoon(2).label(), "Due in 2 days");
        assert_eq!(DueStatus::None.label(), "");
        assert!(DueStatus::Overdue.is_pressing());
        assert!(!DueStatus::Upcoming.is_pressing());
    }

    #[test]
    fn test_relative_age() {
        let now = at("2026-03-10T12:00:00Z");
        assert_eq!(relative_age(now - Duration::seconds(20), now), "just now");
        assert_eq!(relative_age(now + Duration::minutes(5), now), "just now");
        assert_eq!(relative_age(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_age(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_age(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_age(at("2026-01-04T09:00:00Z"), now), "Jan 4, 2026");
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!(matches!(
            parse_timestamp("due_at", "next tuesday"),
            Err(ActionParseError::InvalidTimestamp { field: "due_at", .. })
        ));
    }
}
