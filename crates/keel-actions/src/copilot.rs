//! Structured copilot replies.
//!
//! The copilot answers either with plain text or with one of a fixed set of
//! structured cards. Each card arrives as a JSON object whose `type` field
//! picks the variant; an unrecognised `type` is a parse error rather than a
//! silent fallback to text.

use crate::error::Result;
use crate::priority::Priority;
use serde::{Deserialize, Serialize};

/// One pipeline stage in a summary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    /// Stage name
    pub name: String,
    /// Deals in the stage
    pub count: u32,
    /// Combined deal value
    pub value: f64,
}

/// A contact row in a contact list card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSummary {
    /// Contact record ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Job title
    #[serde(default)]
    pub title: Option<String>,
    /// Company name
    #[serde(default)]
    pub company: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

/// A task row in a task list card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task title
    pub title: String,
    /// Due date as sent
    #[serde(default)]
    pub due_date: Option<String>,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
}

/// Outcome of an action the copilot performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    /// Done
    Success,
    /// Queued for approval in the Action Centre
    Pending,
    /// Failed
    Failed,
}

/// A copilot reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CopilotResponse {
    /// Plain markdown text
    Text {
        /// Message body
        content: String,
    },
    /// Pipeline totals by stage
    PipelineSummary {
        /// Sum of open deal values
        total_value: f64,
        /// Open deal count
        deal_count: u32,
        /// Per-stage breakdown
        #[serde(default)]
        stages: Vec<StageSummary>,
        /// ISO currency code
        #[serde(default = "default_currency")]
        currency: String,
    },
    /// Contacts matching a question
    ContactList {
        /// Contacts
        contacts: Vec<ContactSummary>,
    },
    /// Briefing ahead of a meeting
    MeetingPrep {
        /// Meeting title
        meeting_title: String,
        /// Attendee names
        #[serde(default)]
        attendees: Vec<String>,
        /// Talking points
        #[serde(default)]
        talking_points: Vec<String>,
        /// Recent activity on the account
        #[serde(default)]
        recent_activity: Vec<String>,
    },
    /// Drafted email ready to review
    EmailDraft {
        /// Recipients
        to: Vec<String>,
        /// Subject line
        subject: String,
        /// Body
        body: String,
    },
    /// Tasks the copilot found or created
    TaskList {
        /// Tasks
        tasks: Vec<TaskSummary>,
    },
    /// Result of an action taken on the user's behalf
    ActionConfirmation {
        /// What was done
        action: String,
        /// Outcome
        status: ConfirmationStatus,
        /// Message for the user
        message: String,
        /// Link to the affected record
        #[serde(default)]
        link: Option<String>,
    },
}

fn default_currency() -> String {
    "USD".to_string()
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

impl CopilotResponse {
    /// Decode a reply payload.
    ///
    /// # Errors
    /// `ActionError::Copilot` for unknown `type` values or missing fields.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Wire name of the variant.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::PipelineSummary { .. } => "pipeline_summary",
            Self::ContactList { .. } => "contact_list",
            Self::MeetingPrep { .. } => "meeting_prep",
            Self::EmailDraft { .. } => "email_draft",
            Self::TaskList { .. } => "task_list",
            Self::ActionConfirmation { .. } => "action_confirmation",
        }
    }

    /// One-line summary used in conversation history and notifications.
    #[must_use]
    pub fn summarize(&self) -> String {
        match self {
            Self::Text { content } => content.lines().next().unwrap_or_default().to_string(),
            Self::PipelineSummary {
                total_value,
                deal_count,
                currency,
                ..
            } => format!(
                "{} worth {currency} {total_value:.0}",
                plural(*deal_count as usize, "open deal", "open deals")
            ),
            Self::ContactList { contacts } => plural(contacts.len(), "contact", "contacts"),
            Self::MeetingPrep { meeting_title, .. } => format!("Prep for {meeting_title}"),
            Self::EmailDraft { to, subject, .. } => {
                format!("Draft to {}: {subject}", to.join(", "))
            }
            Self::TaskList { tasks } => plural(tasks.len(), "task", "tasks"),
            Self::ActionConfirmation { message, .. } => message.clone(),
        }
    }
}
