// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Session lifecycle: unlock, validate, lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::session::{Session, SessionStore};
use crate::error::GatewayError;

/// Session lifetime applied when an unlock request omits `duration`.
pub const DEFAULT_UNLOCK_DURATION_SECS: u64 = 600;

/// Upper bound on requested session lifetimes.
pub const MAX_UNLOCK_DURATION_SECS: u64 = 3600;

/// Collaborator that verifies one-time codes.
///
/// The gateway never validates codes itself; the backend (or whichever
/// service issued the second factor) is the authority.
#[async_trait]
pub trait OtpVerifier: Send + Sync {
    /// Returns `Ok(true)` when the code is accepted for this credential.
    async fn verify_otp(&self, access_token: &str, otp: &str) -> Result<bool, GatewayError>;
}

/// Owns the [`SessionStore`] and exposes the unlock/validate/lock operations.
///
/// State machine per owner: `NoSession -> unlock -> Active(deadline) ->
/// (deadline passes | lock) -> NoSession`. All store access goes through a
/// single write lock, so concurrent unlocks for the same owner resolve
/// last-writer-wins.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<RwLock<SessionStore>>,
    owners: Arc<HashMap<String, String>>,
    otp: Arc<dyn OtpVerifier>,
}

impl SessionManager {
    /// Build a manager over a recognized-credential registry and an OTP
    /// verification collaborator.
    pub fn new(owners: HashMap<String, String>, otp: Arc<dyn OtpVerifier>) -> Self {
        Self {
            store: Arc::new(RwLock::new(SessionStore::new())),
            owners: Arc::new(owners),
            otp,
        }
    }

    /// Resolve an access token to its owner identity without touching
    /// session state. This is the gate for the unlock operation itself,
    /// which cannot require a session because it is what mints them.
    pub fn identify(&self, token: &str) -> Result<String, GatewayError> {
        self.owners
            .get(token)
            .cloned()
            .ok_or(GatewayError::UnknownOwner)
    }

    /// Verify the one-time code and install a session for the token's owner.
    ///
    /// The presented access token becomes the session's bearer token. Any
    /// prior session for the same owner is replaced.
    pub async fn unlock(
        &self,
        token: &str,
        otp: &str,
        duration_secs: u64,
    ) -> Result<Session, GatewayError> {
        let owner = self.identify(token)?;

        if !self.otp.verify_otp(token, otp).await? {
            tracing::warn!(owner = %owner, "unlock rejected: invalid one-time code");
            return Err(GatewayError::InvalidOtp);
        }

        let duration = Duration::from_secs(duration_secs.min(MAX_UNLOCK_DURATION_SECS));
        let session = Session::new(token, owner.clone(), duration);

        let mut store = self.store.write().await;
        store.install(session.clone());
        tracing::info!(owner = %owner, expires_at = %session.expires_at, "session unlocked");

        Ok(session)
    }

    /// Look up the bearer token; the single gate every protected route must
    /// pass. Absent and expired sessions fail identically.
    pub async fn validate(&self, token: &str) -> Result<String, GatewayError> {
        let mut store = self.store.write().await;
        store
            .live(token)
            .map(|session| session.owner)
            .ok_or(GatewayError::Unauthenticated)
    }

    /// Remove the session unconditionally. Idempotent.
    pub async fn lock(&self, token: &str) {
        let mut store = self.store.write().await;
        store.remove(token);
    }
}
