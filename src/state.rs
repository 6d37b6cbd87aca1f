// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

use std::sync::Arc;

use crate::auth::SessionManager;
use crate::remote::RemoteWalletApi;

/// Shared application state handed to every request.
///
/// The session manager is constructed explicitly and passed in, never a
/// process-wide singleton, so its lifecycle and locking are visible and
/// testable in isolation.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub remote: Arc<dyn RemoteWalletApi>,
}

impl AppState {
    pub fn new(sessions: SessionManager, remote: Arc<dyn RemoteWalletApi>) -> Self {
        Self { sessions, remote }
    }
}
