use crate::error::CommandError;
use crate::state::AppState;
use keel_interaction::DeleteConfirmation;
use serde_json::json;

/// Delete the active organization once `confirmation` exactly matches its
/// name. A mismatch returns `CONFIRMATION_MISMATCH` without a backend call.
pub async fn delete_organization(
    state: &AppState,
    organization_name: String,
    confirmation: String,
) -> Result<(), CommandError> {
    let org_id = state
        .session
        .org_id()
        .ok_or_else(|| CommandError::new("NO_ORGANIZATION", "No active organization"))?;

    let mut confirm = DeleteConfirmation::new(organization_name);
    confirm.type_text(confirmation);

    confirm
        .submit(|| async {
            tracing::info!("Deleting organization {}", org_id);
            state
                .backend
                .rpc::<_, serde_json::Value>(
                    "delete_organization",
                    &json!({ "p_org_id": org_id.as_str() }),
                )
                .await
                .map_err(CommandError::from)
        })
        .await?;

    tracing::info!("Organization {} deleted", org_id);
    Ok(())
}
