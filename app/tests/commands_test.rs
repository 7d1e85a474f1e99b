//! Integration tests for shell commands.
//!
//! The backend points at a closed local port, so any command that reaches
//! the network fails fast; the tests check which commands stop before that.

use keel_actions::RawAction;
use keel_app::commands::actions::{parse_actions_at, parse_copilot_response, pending_action_count};
use keel_app::commands::organization::delete_organization;
use keel_app::commands::prospect::{estimate_search_cost, search_preview};
use keel_app::state::AppState;
use keel_core::{AppConfig, OrgId, Session, UserId};
use keel_prospect::{estimate, Provider, SearchFilterSet, SearchKind};
use serde_json::json;

const ORG_ID: &str = "0b9c2a4e-5f1d-4c3b-9a8e-7d6f5e4c3b2a";

fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.backend.url = "http://127.0.0.1:9".to_string();
    config.backend.timeout_secs = 2;
    config
}

fn create_test_state(with_org: bool) -> AppState {
    let mut session = Session::new(UserId::generate(), "test-token"); // pragma: allowlist secret
    if with_org {
        session = session.with_org(OrgId::new(ORG_ID).unwrap());
    }
    AppState::new(offline_config(), session).expect("create app state")
}

#[test]
fn test_state_requires_signed_in_session() {
    let mut session = Session::new(UserId::generate(), "test-token"); // pragma: allowlist secret
    session.sign_out();
    assert!(AppState::new(offline_config(), session).is_err());
}

#[test]
fn test_default_provider_falls_back() {
    let mut config = offline_config();
    config.prospecting.default_provider = "crystal-ball".to_string();
    let session = Session::new(UserId::generate(), "test-token"); // pragma: allowlist secret
    let state = AppState::new(config, session).unwrap();
    assert_eq!(state.default_provider(), Provider::AiArk);
}

#[tokio::test]
async fn test_search_preview_rejects_empty_filters() {
    let state = create_test_state(false);
    let err = search_preview(&state, None, SearchFilterSet::company())
        .await
        .unwrap_err();
    assert_eq!(err.code, "EMPTY_FILTERS");
}

#[tokio::test]
async fn test_estimate_survives_unreachable_balance() {
    let state = create_test_state(false);
    let widget = estimate_search_cost(&state, Some(Provider::Apollo), SearchKind::People)
        .await
        .unwrap();

    assert_eq!(widget.balance, None);
    assert_eq!(widget.estimate, estimate(Provider::Apollo, SearchKind::People));
    assert!(widget.can_afford());
}

#[tokio::test]
async fn test_pending_count_reports_request_failure() {
    let state = create_test_state(false);
    let err = pending_action_count(&state).await.unwrap_err();
    assert_eq!(err.code, "REQUEST_FAILED");
    assert_eq!(state.pending.last(), None);
}

#[tokio::test]
async fn test_delete_organization_requires_exact_name() {
    let state = create_test_state(true);
    let err = delete_organization(&state, "Acme Corp".to_string(), "acme corp".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, "CONFIRMATION_MISMATCH");
}

#[tokio::test]
async fn test_delete_organization_requires_active_org() {
    let state = create_test_state(false);
    let err = delete_organization(&state, "Acme Corp".to_string(), "Acme Corp".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, "NO_ORGANIZATION");
}

#[tokio::test]
async fn test_delete_organization_surfaces_backend_failure() {
    let state = create_test_state(true);
    let err = delete_organization(&state, "Acme Corp".to_string(), "Acme Corp".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, "REQUEST_FAILED");
}

#[test]
fn test_parse_actions_splits_cards_and_rejects() {
    let rows: Vec<RawAction> = serde_json::from_value(json!([
        {
            "id": "a1",
            "action_type": "email",
            "priority": "high",
            "created_at": "2026-03-10T10:00:00Z",
            "preview_data": { "to": ["dana@acme.io"], "subject": "Renewal", "body": "Hi Dana" }
        },
        {
            "id": "a2",
            "action_type": "carrier_pigeon",
            "created_at": "2026-03-10T10:00:00Z"
        }
    ]))
    .unwrap();

    let now = chrono::DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let parsed = parse_actions_at(&rows, now);

    assert_eq!(parsed.actions.len(), 1);
    assert_eq!(parsed.actions[0].subtitle, "Renewal");
    assert_eq!(parsed.actions[0].age, "2h ago");
    assert_eq!(parsed.rejected.len(), 1);
    assert_eq!(parsed.rejected[0].id, "a2");
    assert!(parsed.rejected[0].reason.contains("carrier_pigeon"));
}

#[test]
fn test_parse_copilot_response() {
    let response = parse_copilot_response(json!({ "type": "text", "content": "Hello" })).unwrap();
    assert_eq!(response.summarize(), "Hello");

    let err = parse_copilot_response(json!({ "type": "hologram" })).unwrap_err();
    assert_eq!(err.code, "INVALID_COPILOT_RESPONSE");
}
