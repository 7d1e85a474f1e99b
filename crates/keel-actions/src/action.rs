//! AI-suggested actions.
//!
//! Backend rows carry a loosely typed `preview_data` object whose shape
//! depends on `action_type`. [`parse_action`] turns each row into an
//! [`Action`] with a strongly typed [`ActionDetails`] variant, and reports
//! a missing or malformed field instead of substituting an empty value.

use crate::error::ActionParseError;
use crate::priority::{parse_timestamp, Priority};
use chrono::{DateTime, Utc};
use keel_core::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Action row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    /// Row identifier
    pub id: String,
    /// Discriminant of `preview_data`
    pub action_type: String,
    /// Title written by the assistant
    #[serde(default)]
    pub title: Option<String>,
    /// Lifecycle status
    #[serde(default)]
    pub status: Option<String>,
    /// Priority
    #[serde(default)]
    pub priority: Option<String>,
    /// Type-specific payload
    #[serde(default)]
    pub preview_data: Option<Value>,
    /// Creation time, RFC 3339
    pub created_at: String,
    /// Optional deadline
    #[serde(default)]
    pub due_at: Option<String>,
    /// CRM record the action concerns
    #[serde(default)]
    pub entity: Option<EntityRef>,
}

/// CRM record an action is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Record type, e.g. `contact`, `deal`, `company`
    #[serde(rename = "type")]
    pub kind: String,
    /// Record identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Kind of action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Send an email
    Email,
    /// Create a task
    Task,
    /// Post to a Slack channel
    SlackMessage,
    /// Change a CRM field
    FieldUpdate,
    /// Schedule a meeting
    Meeting,
    /// Move a deal to another stage
    DealStage,
}

impl ActionKind {
    /// Label for the action card.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Task => "Task",
            Self::SlackMessage => "Slack message",
            Self::FieldUpdate => "Field update",
            Self::Meeting => "Meeting",
            Self::DealStage => "Deal stage",
        }
    }
}

impl FromStr for ActionKind {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" | "send_email" | "draft_email" => Ok(Self::Email),
            "task" | "create_task" => Ok(Self::Task),
            "slack" | "slack_message" | "send_slack" => Ok(Self::SlackMessage),
            "field_update" | "update_field" | "crm_update" => Ok(Self::FieldUpdate),
            "meeting" | "schedule_meeting" => Ok(Self::Meeting),
            "deal_stage" | "update_deal_stage" | "stage_change" => Ok(Self::DealStage),
            _ => Err(ActionParseError::UnknownType(s.to_string())),
        }
    }
}

/// Lifecycle of an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Waiting for the user
    #[default]
    Pending,
    /// Approved, execution queued
    Approved,
    /// Rejected by the user
    Dismissed,
    /// Executed
    Completed,
    /// Execution failed
    Failed,
}

impl ActionStatus {
    /// Whether the action still needs a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl FromStr for ActionStatus {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "suggested" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "dismissed" | "rejected" => Ok(Self::Dismissed),
            "completed" | "executed" | "done" => Ok(Self::Completed),
            "failed" | "error" => Ok(Self::Failed),
            _ => Err(ActionParseError::UnknownStatus(s.to_string())),
        }
    }
}

/// Type-specific content of an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDetails {
    /// Email to send
    Email {
        /// Recipients
        to: Vec<String>,
        /// Subject line
        subject: String,
        /// Body text
        body: String,
    },
    /// Task to create
    Task {
        /// Task title
        title: String,
        /// Deadline
        due_date: Option<DateTime<Utc>>,
    },
    /// Slack post
    SlackMessage {
        /// Channel name, with or without `#`
        channel: String,
        /// Message text
        message: String,
    },
    /// CRM field change
    FieldUpdate {
        /// Field name
        field: String,
        /// Current value, absent when the field is empty
        old: Option<String>,
        /// Proposed value
        new: String,
    },
    /// Meeting to schedule
    Meeting {
        /// Attendee names or emails
        attendees: Vec<String>,
        /// Start time
        starts_at: DateTime<Utc>,
    },
    /// Deal stage move
    DealStage {
        /// Deal name
        deal: String,
        /// Current stage
        from: Option<String>,
        /// Target stage
        to: String,
    },
}

impl ActionDetails {
    /// Kind of these details.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Email { .. } => ActionKind::Email,
            Self::Task { .. } => ActionKind::Task,
            Self::SlackMessage { .. } => ActionKind::SlackMessage,
            Self::FieldUpdate { .. } => ActionKind::FieldUpdate,
            Self::Meeting { .. } => ActionKind::Meeting,
            Self::DealStage { .. } => ActionKind::DealStage,
        }
    }

    /// Parse `preview_data` for `kind`.
    ///
    /// # Errors
    /// `MissingField` or `InvalidField` when the payload does not match the kind.
    pub fn parse(kind: ActionKind, action_type: &str, data: &Value) -> Result<Self, ActionParseError> {
        let empty = Map::new();
        let fields = Fields {
            action_type,
            map: match data {
                Value::Object(map) => map,
                Value::Null => &empty,
                _ => {
                    return Err(ActionParseError::InvalidField {
                        field: "preview_data",
                        reason: "expected an object".to_string(),
                    })
                }
            },
        };

        Ok(match kind {
            ActionKind::Email => Self::Email {
                to: fields.required_list("to")?,
                subject: fields.required("subject")?,
                body: fields.required_allow_empty("body")?,
            },
            ActionKind::Task => Self::Task {
                title: fields.required("title")?,
                due_date: fields.timestamp("due_date")?,
            },
            ActionKind::SlackMessage => Self::SlackMessage {
                channel: fields.required("channel")?,
                message: fields.required("message")?,
            },
            ActionKind::FieldUpdate => Self::FieldUpdate {
                field: fields.required("field")?,
                old: fields.optional("old_value")?,
                new: fields.required_allow_empty("new_value")?,
            },
            ActionKind::Meeting => Self::Meeting {
                attendees: fields.required_list("attendees")?,
                starts_at: fields
                    .timestamp("starts_at")?
                    .ok_or_else(|| fields.missing("starts_at"))?,
            },
            ActionKind::DealStage => Self::DealStage {
                deal: fields.required("deal_name")?,
                from: fields.optional("from_stage")?,
                to: fields.required("to_stage")?,
            },
        })
    }

    /// Fallback title when the row has none.
    #[must_use]
    pub fn default_title(&self) -> String {
        match self {
            Self::Email { to, .. } => format!("Email {}", to.join(", ")),
            Self::Task { title, .. } => title.clone(),
            Self::SlackMessage { channel, .. } => format!("Post in #{}", channel.trim_start_matches('#')),
            Self::FieldUpdate { field, .. } => format!("Update {field}"),
            Self::Meeting { attendees, .. } => format!("Meet {}", attendees.join(", ")),
            Self::DealStage { deal, to, .. } => format!("Move {deal} to {to}"),
        }
    }
}

struct Fields<'a> {
    action_type: &'a str,
    map: &'a Map<String, Value>,
}

impl Fields<'_> {
    fn missing(&self, field: &'static str) -> ActionParseError {
        ActionParseError::MissingField {
            action_type: self.action_type.to_string(),
            field,
        }
    }

    /// Scalar as text; numbers and booleans are rendered, null is absent.
    fn optional(&self, field: &'static str) -> Result<Option<String>, ActionParseError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(ActionParseError::InvalidField {
                field,
                reason: "expected a scalar".to_string(),
            }),
        }
    }

    fn required_allow_empty(&self, field: &'static str) -> Result<String, ActionParseError> {
        self.optional(field)?.ok_or_else(|| self.missing(field))
    }

    fn required(&self, field: &'static str) -> Result<String, ActionParseError> {
        let value = self.required_allow_empty(field)?;
        if value.trim().is_empty() {
            return Err(self.missing(field));
        }
        Ok(value)
    }

    /// A string or an array of strings; must end up non-empty.
    fn required_list(&self, field: &'static str) -> Result<Vec<String>, ActionParseError> {
        let list: Vec<String> = match self.map.get(field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(|s| s.trim().to_string())
                        .ok_or_else(|| ActionParseError::InvalidField {
                            field,
                            reason: "expected a list of strings".to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect(),
            Some(_) => {
                return Err(ActionParseError::InvalidField {
                    field,
                    reason: "expected a string or a list".to_string(),
                })
            }
        };
        if list.is_empty() {
            return Err(self.missing(field));
        }
        Ok(list)
    }

    fn timestamp(&self, field: &'static str) -> Result<Option<DateTime<Utc>>, ActionParseError> {
        self.optional(field)?
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_timestamp(field, &s))
            .transpose()
    }
}

/// A parsed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    /// Row identifier
    pub id: RecordId,
    /// Title
    pub title: String,
    /// Lifecycle status
    pub status: ActionStatus,
    /// Priority
    pub priority: Priority,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Deadline
    pub due_at: Option<DateTime<Utc>>,
    /// CRM record the action concerns
    pub entity: Option<EntityRef>,
    /// Typed payload
    pub details: ActionDetails,
}

impl Action {
    /// Kind of action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.details.kind()
    }
}

/// Parse one backend row.
///
/// Missing status and priority default to pending and medium; any value
/// that is present must be recognised.
///
/// # Errors
/// Returns the first problem found in the row.
pub fn parse_action(raw: &RawAction) -> Result<Action, ActionParseError> {
    let kind: ActionKind = raw.action_type.parse()?;
    let id = RecordId::new(raw.id.clone()).map_err(|e| ActionParseError::InvalidField {
        field: "id",
        reason: e.to_string(),
    })?;
    let details = ActionDetails::parse(
        kind,
        &raw.action_type,
        raw.preview_data.as_ref().unwrap_or(&Value::Null),
    )?;

    let status = match raw.status.as_deref() {
        Some(s) => s.parse()?,
        None => ActionStatus::default(),
    };
    let priority = match raw.priority.as_deref() {
        Some(p) => p.parse()?,
        None => Priority::default(),
    };
    let due_at = match raw.due_at.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(due) => Some(parse_timestamp("due_at", due)?),
        None => None,
    };
    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| details.default_title(), ToString::to_string);

    Ok(Action {
        id,
        title,
        status,
        priority,
        created_at: parse_timestamp("created_at", &raw.created_at)?,
        due_at,
        entity: raw.entity.clone(),
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(action_type: &str, preview: Value) -> RawAction {
        RawAction {
            id: "act_1".to_string(),
            action_type: action_type.to_string(),
            title: None,
            status: Some("pending".to_string()),
            priority: Some("high".to_string()),
            preview_data: Some(preview),
            created_at: "2026-03-10T09:00:00Z".to_string(),
            due_at: None,
            entity: None,
        }
    }

    #[test]
    fn test_parse_email() {
        let action = parse_action(&raw(
            "send_email",
            json!({ "to": ["ana@acme.io"], "subject": "Renewal", "body": "" }),
        ))
        .unwrap();
        assert_eq!(action.kind(), ActionKind::Email);
        assert_eq!(action.priority, Priority::High);
        assert_eq!(action.title, "Email ana@acme.io");
        assert_eq!(
            action.details,
            ActionDetails::Email {
                to: vec!["ana@acme.io".to_string()],
                subject: "Renewal".to_string(),
                body: String::new(),
            }
        );
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let err = parse_action(&raw("email", json!({ "to": "ana@acme.io", "body": "hi" })))
            .unwrap_err();
        assert_eq!(
            err,
            ActionParseError::MissingField {
                action_type: "email".to_string(),
                field: "subject",
            }
        );

        let err = parse_action(&raw("slack", json!({ "channel": "  ", "message": "x" }))).unwrap_err();
        assert!(matches!(err, ActionParseError::MissingField { field: "channel", .. }));
    }

    #[test]
    fn test_unknown_type() {
        let err = parse_action(&raw("fax", json!({}))).unwrap_err();
        assert_eq!(err, ActionParseError::UnknownType("fax".to_string()));
    }

    #[test]
    fn test_field_update_keeps_numeric_values() {
        let action = parse_action(&raw(
            "field_update",
            json!({ "field": "amount", "old_value": null, "new_value": 12000 }),
        ))
        .unwrap();
        assert_eq!(
            action.details,
            ActionDetails::FieldUpdate {
                field: "amount".to_string(),
                old: None,
                new: "12000".to_string(),
            }
        );
    }

    #[test]
    fn test_meeting_requires_start() {
        let err = parse_action(&raw("meeting", json!({ "attendees": ["Ana"] }))).unwrap_err();
        assert!(matches!(err, ActionParseError::MissingField { field: "starts_at", .. }));

        let err = parse_action(&raw(
            "meeting",
            json!({ "attendees": ["Ana"], "starts_at": "soon" }),
        ))
        .unwrap_err();
        assert!(matches!(err, ActionParseError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_invalid_list_item() {
        let err = parse_action(&raw("email", json!({ "to": [1], "subject": "s", "body": "b" })))
            .unwrap_err();
        assert!(matches!(err, ActionParseError::InvalidField { field: "to", .. }));
    }

    #[test]
    fn test_unknown_status_and_priority() {
        let mut row = raw("task", json!({ "title": "Call back" }));
        row.status = Some("archived".to_string());
        assert!(matches!(parse_action(&row), Err(ActionParseError::UnknownStatus(_))));

        let mut row = raw("task", json!({ "title": "Call back" }));
        row.priority = Some("p0".to_string());
        assert!(matches!(parse_action(&row), Err(ActionParseError::UnknownPriority(_))));

        let mut row = raw("task", json!({ "title": "Call back" }));
        row.status = None;
        row.priority = None;
        let action = parse_action(&row).unwrap();
        assert_eq!(action.status, ActionStatus::Pending);
        assert_eq!(action.priority, Priority::Medium);
    }

    #[test]
    fn test_row_deserialization() {
        let row: RawAction = serde_json::from_value(json!({
            "id": "a1",
            "action_type": "deal_stage",
            "preview_data": { "deal_name": "Acme renewal", "from_stage": "Proposal", "to_stage": "Negotiation" },
            "created_at": "2026-03-01T10:00:00+01:00",
            "entity": { "type": "deal", "id": "d1", "name": "Acme renewal" }
        }))
        .unwrap();
        let action = parse_action(&row).unwrap();
        assert_eq!(action.title, "Move Acme renewal to Negotiation");
        assert_eq!(action.created_at.to_rfc3339(), "2026-03-01T09:00:00+00:00");
        assert_eq!(action.entity.unwrap().kind, "deal");
    }
}
