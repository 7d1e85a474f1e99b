//! Shared types used across the Keel client.
//!
//! This module defines common newtypes that provide type safety
//! and clear domain modeling.

use crate::error::KeelError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn validate_uuid(kind: &str, id: &str) -> Result<(), KeelError> {
    static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = UUID_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("valid regex")
    });

    if regex.is_match(id) {
        Ok(())
    } else {
        Err(KeelError::Validation(format!(
            "invalid {kind}: must be a lowercase UUID, got '{id}'"
        )))
    }
}

/// Newtype for authenticated user identifiers.
///
/// User IDs are the backend's auth UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a valid UUID.
    pub fn new(id: impl Into<String>) -> Result<Self, KeelError> {
        let id = id.into();
        validate_uuid("user ID", &id)?;
        Ok(Self(id))
    }

    /// Create a new random `UserId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for organization identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(String);

impl OrgId {
    /// Create a new `OrgId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a valid UUID.
    pub fn new(id: impl Into<String>) -> Result<Self, KeelError> {
        let id = id.into();
        validate_uuid("organization ID", &id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a backend row (actions, tasks, tables).
///
/// Must be non-empty and free of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new `RecordId`.
    ///
    /// # Errors
    /// Returns error if the ID is empty or padded with whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, KeelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(KeelError::Validation("record ID must not be empty".to_string()));
        }
        if id.trim() != id {
            return Err(KeelError::Validation(format!(
                "record ID must not have surrounding whitespace, got '{id}'"
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `DateTime<Utc>`.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, KeelError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| KeelError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_valid() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        let user_id = UserId::new(id).expect("valid user ID");
        assert_eq!(user_id.as_str(), id);
    }

    #[test]
    fn test_user_id_invalid() {
        let invalid_ids = vec![
            "not-a-uuid",
            "550E8400-E29B-41D4-A716-446655440000", // Uppercase
            "550e8400-e29b-41d4-x716-446655440000", // Invalid hex
            "",
        ];

        for id in invalid_ids {
            assert!(UserId::new(id).is_err(), "Should fail for: {id}");
        }
    }

    #[test]
    fn test_user_id_generate() {
        let id1 = UserId::generate();
        let id2 = UserId::generate();
        assert_ne!(id1, id2);
        assert!(UserId::new(id1.as_str()).is_ok());
    }

    #[test]
    fn test_org_id_rejects_garbage() {
        assert!(OrgId::new("acme").is_err());
        assert!(OrgId::new("7f1c2a4e-0b5d-4c8e-9a3f-2d6b1e0c9f88").is_ok());
    }

    #[test]
    fn test_record_id() {
        assert!(RecordId::new("act_123").is_ok());
        assert!(RecordId::new("").is_err());
        assert!(RecordId::new(" act_123").is_err());
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let ts = Timestamp::from_rfc3339("2026-03-01T09:30:00Z").expect("parse timestamp");
        assert_eq!(ts.to_rfc3339(), "2026-03-01T09:30:00+00:00");
        assert!(Timestamp::from_rfc3339("yesterday").is_err());
    }

    #[test]
    fn test_timestamp_serialization() {
        let ts = Timestamp::from_rfc3339("2026-03-01T09:30:00Z").expect("parse timestamp");
        let json = serde_json::to_string(&ts).expect("serialize timestamp");
        let parsed: Timestamp = serde_json::from_str(&json).expect("deserialize timestamp");
        assert_eq!(parsed, ts);
    }
}
