//! Signed-in user context.
//!
//! Services receive a `Session` explicitly instead of reading an ambient
//! auth provider. The access token is zeroized when the session is signed
//! out or dropped.

use crate::error::KeelError;
use crate::types::{OrgId, Timestamp, UserId};
use std::fmt;
use zeroize::Zeroizing;

/// Authenticated user context passed to every outward call.
#[derive(Clone)]
pub struct Session {
    user_id: UserId,
    org_id: Option<OrgId>,
    access_token: Option<Zeroizing<String>>,
    expires_at: Option<Timestamp>,
}

impl Session {
    /// Create a session for a user with an access token.
    pub fn new(user_id: UserId, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            org_id: None,
            access_token: Some(Zeroizing::new(access_token.into())),
            expires_at: None,
        }
    }

    /// Scope the session to an organization.
    #[must_use]
    pub fn with_org(mut self, org_id: OrgId) -> Self {
        self.org_id = Some(org_id);
        self
    }

    /// Set the token expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// The signed-in user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The active organization, if any.
    pub fn org_id(&self) -> Option<&OrgId> {
        self.org_id.as_ref()
    }

    /// Whether a token is held.
    pub fn is_signed_in(&self) -> bool {
        self.access_token.is_some()
    }

    /// Whether the token has expired at `now`. Sessions without an expiry never expire.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// `Authorization` header value for the token.
    ///
    /// # Errors
    /// Returns `KeelError::Session` if signed out.
    pub fn bearer(&self) -> Result<String, KeelError> {
        self.access_token
            .as_ref()
            .map(|token| format!("Bearer {}", token.as_str()))
            .ok_or_else(|| KeelError::Session("not signed in".to_string()))
    }

    /// Drop the token.
    pub fn sign_out(&mut self) {
        self.access_token = None;
        tracing::info!("Session signed out for user {}", self.user_id);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("org_id", &self.org_id)
            .field("signed_in", &self.is_signed_in())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("550e8400-e29b-41d4-a716-446655440000").expect("valid user ID")
    }

    #[test]
    fn test_session_bearer() {
        let session = Session::new(user(), "abc");
        assert!(session.is_signed_in());
        assert_eq!(session.bearer().expect("bearer"), "Bearer abc");
    }

    #[test]
    fn test_session_sign_out() {
        let mut session = Session::new(user(), "abc");
        session.sign_out();
        assert!(!session.is_signed_in());
        assert!(matches!(session.bearer(), Err(KeelError::Session(_))));
    }

    #[test]
    fn test_session_expiry() {
        let exp = Timestamp::from_rfc3339("2026-01-01T00:00:00Z").expect("timestamp");
        let session = Session::new(user(), "abc").with_expiry(exp);

        let before = Timestamp::from_rfc3339("2025-12-31T23:59:59Z").expect("timestamp");
        let after = Timestamp::from_rfc3339("2026-01-01T00:00:01Z").expect("timestamp");
        assert!(!session.is_expired(before));
        assert!(session.is_expired(after));
        assert!(!Session::new(user(), "abc").is_expired(after));
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = Session::new(user(), "super-secret");
        assert!(!format!("{session:?}").contains("super-secret"));
    }

    #[test]
    fn test_session_org_scope() {
        let org = OrgId::new("7f1c2a4e-0b5d-4c8e-9a3f-2d6b1e0c9f88").expect("valid org ID");
        let session = Session::new(user(), "abc").with_org(org.clone());
        assert_eq!(session.org_id(), Some(&org));
    }
}
