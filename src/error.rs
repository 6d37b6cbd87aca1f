// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Gateway error taxonomy.
//!
//! Every handled route either returns a success body matching its contract
//! or one of these errors. Authentication failures short-circuit before any
//! proxying or handler logic runs; cryptographic failures never expose
//! partial plaintext or key material.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error type for every route the gateway serves.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing, invalid, or expired bearer credential.
    #[error("authentication required")]
    Unauthenticated,

    /// The presented access token does not map to a known owner.
    #[error("access token does not belong to a known owner")]
    UnknownOwner,

    /// The one-time code was rejected.
    #[error("one-time code is invalid")]
    InvalidOtp,

    /// Authentication-tag mismatch or malformed encrypted payload.
    #[error("decryption failed")]
    DecryptionFailed,

    /// The wallet passphrase did not unlock the wallet's key material.
    #[error("wallet passphrase is invalid")]
    InvalidPassphrase,

    /// The backend refused to broadcast for balance reasons.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Network failure or timeout talking to the wallet backend.
    #[error("wallet backend unavailable: {0}")]
    RemoteUnavailable(String),

    /// The backend returned a business error.
    #[error("wallet backend rejected the request: {message}")]
    RemoteRejected { status: u16, message: String },

    /// No route matched the request.
    #[error("not found")]
    NotFound,

    /// Malformed request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Local fault while assembling a response or handling key material.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: String,
}

impl GatewayError {
    /// Machine-readable error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated => "unauthenticated",
            GatewayError::UnknownOwner => "unknown_owner",
            GatewayError::InvalidOtp => "invalid_otp",
            GatewayError::DecryptionFailed => "decryption_failed",
            GatewayError::InvalidPassphrase => "invalid_passphrase",
            GatewayError::InsufficientFunds => "insufficient_funds",
            GatewayError::RemoteUnavailable(_) => "remote_unavailable",
            GatewayError::RemoteRejected { .. } => "remote_rejected",
            GatewayError::NotFound => "not_found",
            GatewayError::BadRequest(_) => "bad_request",
            GatewayError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthenticated
            | GatewayError::UnknownOwner
            | GatewayError::InvalidOtp => StatusCode::UNAUTHORIZED,
            GatewayError::DecryptionFailed
            | GatewayError::InvalidPassphrase
            | GatewayError::InsufficientFunds
            | GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::RemoteUnavailable(_) => StatusCode::BAD_GATEWAY,
            // Relay backend client errors as-is; anything else becomes a
            // gateway-level failure rather than a trusted success.
            GatewayError::RemoteRejected { status, .. } => {
                if (400..500).contains(status) {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
