//! View models for the Action Centre.

use crate::action::{parse_action, Action, ActionDetails, ActionKind, ActionStatus, RawAction};
use crate::error::ActionParseError;
use crate::priority::{relative_age, DueStatus, Priority};
use chrono::{DateTime, Utc};
use keel_core::RecordId;
use serde::Serialize;

/// One labelled line in an action card's detail section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    /// Field label
    pub label: &'static str,
    /// Field value
    pub value: String,
}

impl DetailLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Everything an action card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayAction {
    /// Row identifier
    pub id: RecordId,
    /// Action kind
    pub kind: ActionKind,
    /// Title
    pub title: String,
    /// Record the action concerns, or a one-line summary of the payload
    pub subtitle: String,
    /// Priority badge
    pub priority: Priority,
    /// Lifecycle status
    pub status: ActionStatus,
    /// "3h ago" style age
    pub age: String,
    /// Deadline badge
    pub due: DueStatus,
    /// Detail lines
    pub details: Vec<DetailLine>,
}

/// Detail lines for an action payload.
#[must_use]
pub fn extract_details(details: &ActionDetails) -> Vec<DetailLine> {
    match details {
        ActionDetails::Email { to, subject, body } => {
            let mut lines = vec![
                DetailLine::new("To", to.join(", ")),
                DetailLine::new("Subject", subject.clone()),
            ];
            if !body.trim().is_empty() {
                lines.push(DetailLine::new("Body", body.clone()));
            }
            lines
        }
        ActionDetails::Task { title, due_date } => {
            let mut lines = vec![DetailLine::new("Task", title.clone())];
            if let Some(due) = due_date {
                lines.push(DetailLine::new("Due", due.format("%b %-d, %Y").to_string()));
            }
            lines
        }
        ActionDetails::SlackMessage { channel, message } => vec![
            DetailLine::new("Channel", format!("#{}", channel.trim_start_matches('#'))),
            DetailLine::new("Message", message.clone()),
        ],
        ActionDetails::FieldUpdate { field, old, new } => vec![
            DetailLine::new("Field", field.clone()),
            DetailLine::new("From", old.clone().unwrap_or_else(|| "(empty)".to_string())),
            DetailLine::new("To", new.clone()),
        ],
        ActionDetails::Meeting {
            attendees,
            starts_at,
        } => vec![
            DetailLine::new("Attendees", attendees.join(", ")),
            DetailLine::new("Starts", starts_at.format("%b %-d, %Y %H:%M UTC").to_string()),
        ],
        ActionDetails::DealStage { deal, from, to } => {
            let stages = match from {
                Some(from) => format!("{from} → {to}"),
                None => to.clone(),
            };
            vec![
                DetailLine::new("Deal", deal.clone()),
                DetailLine::new("Stage", stages),
            ]
        }
    }
}

fn summary(details: &ActionDetails) -> String {
    match details {
        ActionDetails::Email { subject, .. } => subject.clone(),
        ActionDetails::Task { title, .. } => title.clone(),
        ActionDetails::SlackMessage { channel, .. } => {
            format!("#{}", channel.trim_start_matches('#'))
        }
        ActionDetails::FieldUpdate { field, new, .. } => format!("{field}: {new}"),
        ActionDetails::Meeting { attendees, .. } => match attendees.len() {
            1 => "1 attendee".to_string(),
            n => format!("{n} attendees"),
        },
        ActionDetails::DealStage { deal, .. } => deal.clone(),
    }
}

/// Card view of a parsed action at `now`.
#[must_use]
pub fn display(action: &Action, now: DateTime<Utc>) -> DisplayAction {
    let subtitle = action
        .entity
        .as_ref()
        .and_then(|e| e.name.clone())
        .unwrap_or_else(|| summary(&action.details));

    DisplayAction {
        id: action.id.clone(),
        kind: action.kind(),
        title: action.title.clone(),
        subtitle,
        priority: action.priority,
        status: action.status,
        age: relative_age(action.created_at, now),
        due: DueStatus::of(action.due_at, now),
        details: extract_details(&action.details),
    }
}

/// Parse a row and build its card.
///
/// # Errors
/// The row's parse error.
pub fn to_display_action(
    raw: &RawAction,
    now: DateTime<Utc>,
) -> Result<DisplayAction, ActionParseError> {
    parse_action(raw).map(|action| display(&action, now))
}

/// Cards for every well-formed row, most urgent first, plus the rows that
/// failed to parse.
///
/// Malformed rows are logged and returned rather than dropped silently.
#[must_use]
pub fn display_actions(
    rows: &[RawAction],
    now: DateTime<Utc>,
) -> (Vec<DisplayAction>, Vec<(String, ActionParseError)>) {
    let mut cards = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for row in rows {
        match to_display_action(row, now) {
            Ok(card) => cards.push(card),
            Err(err) => {
                tracing::warn!("Skipping malformed action {}: {}", row.id, err);
                rejected.push((row.id.clone(), err));
            }
        }
    }

    // Stable sort keeps backend order inside a priority
    cards.sort_by_key(|card| card.priority);
    (cards, rejected)
}
