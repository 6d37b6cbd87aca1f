// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Session data and expiry logic.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// A time-bounded authentication grant keyed by an opaque bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    /// The bearer token the client presents on every request.
    pub token: String,
    /// Owner identity the session was granted to.
    pub owner: String,
    /// Wall-clock creation time (reporting only).
    pub created_at: DateTime<Utc>,
    /// Wall-clock expiry time (reporting only).
    pub expires_at: DateTime<Utc>,
    /// Monotonic deadline; the session is valid iff `Instant::now()` is
    /// strictly before this.
    deadline: Instant,
}

impl Session {
    /// Create a session expiring `duration` from now.
    pub fn new(token: impl Into<String>, owner: impl Into<String>, duration: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            token: token.into(),
            owner: owner.into(),
            created_at,
            expires_at: created_at
                + chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero()),
            deadline: Instant::now() + duration,
        }
    }

    /// Construct a session with an explicit monotonic deadline.
    #[cfg(test)]
    pub fn with_deadline(
        token: impl Into<String>,
        owner: impl Into<String>,
        deadline: Instant,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            token: token.into(),
            owner: owner.into(),
            created_at,
            expires_at: created_at,
            deadline,
        }
    }

    /// Whether the session is still valid.
    pub fn is_live(&self) -> bool {
        Instant::now() < self.deadline
    }
}

/// In-memory session store keyed by bearer token.
///
/// The store itself is not synchronized; [`super::SessionManager`] wraps it
/// in a lock and serializes all access.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session, replacing any existing session for the same owner.
    ///
    /// One session per owner: whichever unlock completes last wins.
    pub fn install(&mut self, session: Session) {
        self.sessions
            .retain(|_, existing| existing.owner != session.owner);
        self.sessions.insert(session.token.clone(), session);
    }

    /// Look up a live session, removing it if it has expired.
    ///
    /// An expired session is treated as absent, never returned.
    pub fn live(&mut self, token: &str) -> Option<Session> {
        match self.sessions.get(token) {
            Some(session) if session.is_live() => Some(session.clone()),
            Some(_) => {
                self.sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Remove a session unconditionally. Removing an absent session is fine.
    pub fn remove(&mut self, token: &str) {
        self.sessions.remove(token);
    }

    /// Number of stored sessions, expired ones included until next lookup.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_session_is_returned() {
        let mut store = SessionStore::new();
        store.install(Session::new("tok", "test", Duration::from_secs(60)));

        let session = store.live("tok").expect("session is live");
        assert_eq!(session.owner, "test");
        assert_eq!(session.token, "tok");
    }

    #[test]
    fn expired_session_is_treated_as_absent() {
        let mut store = SessionStore::new();
        let past = Instant::now() - Duration::from_secs(1);
        store.install(Session::with_deadline("tok", "test", past));

        assert!(store.live("tok").is_none());
        // The expired entry is gone, not merely flagged.
        assert!(store.is_empty());
    }

    #[test]
    fn zero_duration_expires_immediately() {
        let mut store = SessionStore::new();
        store.install(Session::new("tok", "test", Duration::ZERO));
        assert!(store.live("tok").is_none());
    }

    #[test]
    fn new_unlock_replaces_prior_session_for_owner() {
        let mut store = SessionStore::new();
        store.install(Session::new("tok-a", "test", Duration::from_secs(60)));
        store.install(Session::new("tok-b", "test", Duration::from_secs(60)));

        assert!(store.live("tok-a").is_none());
        assert!(store.live("tok-b").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sessions_for_different_owners_coexist() {
        let mut store = SessionStore::new();
        store.install(Session::new("tok-a", "alice", Duration::from_secs(60)));
        store.install(Session::new("tok-b", "bob", Duration::from_secs(60)));

        assert!(store.live("tok-a").is_some());
        assert!(store.live("tok-b").is_some());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = SessionStore::new();
        store.install(Session::new("tok", "test", Duration::from_secs(60)));
        store.remove("tok");
        store.remove("tok");
        assert!(store.live("tok").is_none());
    }
}
