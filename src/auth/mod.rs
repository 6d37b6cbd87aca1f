// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! # Authentication Module
//!
//! Session-based bearer authentication for the gateway.
//!
//! ## Auth Flow
//!
//! 1. The client holds a long-lived access token the gateway recognizes
//!    (configured via `ACCESS_TOKENS`).
//! 2. `POST /user/unlock` presents that token plus a one-time code; the code
//!    is verified by the backend and a time-bounded session is installed,
//!    keyed by the same bearer token.
//! 3. Every other protected route passes through [`SessionManager::validate`]
//!    before any proxying or local handling occurs.
//!
//! ## Security
//!
//! - Expiry is checked lazily on every validation using a monotonic clock;
//!   an expired session is indistinguishable from an absent one.
//! - Explicit lock and expiry both delete the session outright; there is no
//!   cached or intermediate state.
//! - A new unlock for the same owner replaces any prior session for that
//!   owner (last unlock wins).

pub mod manager;
pub mod session;

pub use manager::{OtpVerifier, SessionManager, DEFAULT_UNLOCK_DURATION_SECS};
pub use session::{Session, SessionStore};
