use crate::error::CommandError;
use crate::state::AppState;
use chrono::{DateTime, Utc};
use keel_actions::{display_actions, CopilotResponse, DisplayAction, RawAction};
use serde::Serialize;

/// A row that could not be shown, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedAction {
    /// Row identifier
    pub id: String,
    /// Parse failure
    pub reason: String,
}

/// Action Centre cards plus the rows that failed to parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedActions {
    /// Cards, most urgent first
    pub actions: Vec<DisplayAction>,
    /// Malformed rows
    pub rejected: Vec<RejectedAction>,
}

/// Number of actions awaiting review, served from cache while fresh.
pub async fn pending_action_count(state: &AppState) -> Result<u64, CommandError> {
    Ok(state.pending.count().await?)
}

/// Turn raw action rows into cards.
pub fn parse_actions(rows: Vec<RawAction>) -> Result<ParsedActions, CommandError> {
    Ok(parse_actions_at(&rows, Utc::now()))
}

/// [`parse_actions`] with an explicit clock.
pub fn parse_actions_at(rows: &[RawAction], now: DateTime<Utc>) -> ParsedActions {
    let (actions, rejected) = display_actions(rows, now);
    ParsedActions {
        actions,
        rejected: rejected
            .into_iter()
            .map(|(id, err)| RejectedAction {
                id,
                reason: err.to_string(),
            })
            .collect(),
    }
}

/// Decode a copilot reply.
pub fn parse_copilot_response(
    payload: serde_json::Value,
) -> Result<CopilotResponse, CommandError> {
    let response = CopilotResponse::from_json(payload)?;
    tracing::debug!("Copilot {}: {}", response.type_name(), response.summarize());
    Ok(response)
}
