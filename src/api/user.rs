// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Session unlock.

use crate::auth::DEFAULT_UNLOCK_DURATION_SECS;
use crate::error::GatewayError;
use crate::models::{SessionInfo, UnlockRequest, UnlockResponse};
use crate::state::AppState;

/// `POST /user/unlock`. Verifies the one-time code against the backend and
/// installs a session keyed on the presented access token.
pub async fn unlock(
    state: &AppState,
    token: &str,
    request: UnlockRequest,
) -> Result<UnlockResponse, GatewayError> {
    let duration = request.duration.unwrap_or(DEFAULT_UNLOCK_DURATION_SECS);
    let session = state.sessions.unlock(token, &request.otp, duration).await?;

    Ok(UnlockResponse {
        session: SessionInfo {
            client: session.owner,
            unlocked_at: session.created_at,
            expires: session.expires_at,
        },
    })
}
