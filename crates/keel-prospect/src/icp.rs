//! Saved ideal-customer profiles.
//!
//! A profile is a named filter set stored by the backend and reused to seed
//! new searches.

use crate::credits::SearchKind;
use crate::error::{ProspectError, Result};
use crate::filters::SearchFilterSet;
use async_trait::async_trait;
use keel_backend::BackendClient;
use keel_core::{OrgId, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// A named filter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcpProfile {
    /// Profile identifier
    pub id: RecordId,
    /// Display name
    pub name: String,
    /// Filters applied when the profile is chosen
    pub filters: SearchFilterSet,
}

impl IcpProfile {
    /// Create a profile, rejecting blank names and empty filters.
    ///
    /// # Errors
    /// `Validation` for a blank name, or the filter validation error.
    pub fn new(id: RecordId, name: impl Into<String>, filters: SearchFilterSet) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ProspectError::Validation(
                "profile name must not be empty".to_string(),
            ));
        }
        filters.validate()?;
        Ok(Self { id, name, filters })
    }

    /// Whether the profile targets companies or people.
    #[must_use]
    pub fn kind(&self) -> SearchKind {
        self.filters.kind()
    }
}

/// Storage for profiles.
#[async_trait]
pub trait IcpStore: Send + Sync {
    /// All profiles, ordered by name.
    async fn list(&self) -> Result<Vec<IcpProfile>>;

    /// Insert or replace a profile.
    async fn save(&self, profile: &IcpProfile) -> Result<()>;

    /// Remove a profile. Removing an unknown id is not an error.
    async fn delete(&self, id: &RecordId) -> Result<()>;

    /// One profile by id.
    async fn get(&self, id: &RecordId) -> Result<Option<IcpProfile>> {
        Ok(self.list().await?.into_iter().find(|p| &p.id == id))
    }
}

/// Profiles held in memory.
#[derive(Debug, Default)]
pub struct MemoryIcpStore {
    profiles: Mutex<BTreeMap<RecordId, IcpProfile>>,
}

impl MemoryIcpStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IcpStore for MemoryIcpStore {
    async fn list(&self) -> Result<Vec<IcpProfile>> {
        let mut profiles: Vec<IcpProfile> = self
            .profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    async fn save(&self, profile: &IcpProfile) -> Result<()> {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        Ok(())
    }
}

/// Profiles stored through backend procedures, scoped to an organization.
pub struct BackendIcpStore {
    backend: BackendClient,
    org_id: OrgId,
}

impl BackendIcpStore {
    /// Store for `org_id`'s profiles.
    #[must_use]
    pub fn new(backend: BackendClient, org_id: OrgId) -> Self {
        Self { backend, org_id }
    }
}

#[async_trait]
impl IcpStore for BackendIcpStore {
    async fn list(&self) -> Result<Vec<IcpProfile>> {
        let mut profiles: Vec<IcpProfile> = self
            .backend
            .rpc("list_icp_profiles", &json!({ "p_org_id": self.org_id }))
            .await?;
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    async fn save(&self, profile: &IcpProfile) -> Result<()> {
        let _: serde_json::Value = self
            .backend
            .rpc(
                "upsert_icp_profile",
                &json!({ "p_org_id": self.org_id, "p_profile": profile }),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let _: serde_json::Value = self
            .backend
            .rpc(
                "delete_icp_profile",
                &json!({ "p_org_id": self.org_id, "p_profile_id": id }),
            )
            .await?;
        Ok(())
    }
}
