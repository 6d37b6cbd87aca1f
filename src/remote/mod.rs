// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! # Remote Wallet Backend Client
//!
//! The backend is the system of record for wallets, balances, labels, and
//! broadcast transactions. The gateway talks to it through the
//! [`RemoteWalletApi`] trait so tests can substitute a recording mock; the
//! production implementation lives in [`http`].
//!
//! Two failure modes are kept distinct end to end: [`RemoteError::Unavailable`]
//! for network failures and timeouts, [`RemoteError::Rejected`] for business
//! errors the backend returned. A rejection is never mistaken for transport
//! success, and backend error text is surfaced but not trusted.

pub mod http;

use async_trait::async_trait;
use axum::http::Method;

use crate::error::GatewayError;

pub use http::HttpRemoteClient;

/// A request captured for verbatim forwarding.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    /// Path plus query string, relative to the backend base URL.
    pub path_and_query: String,
    /// Restricted header subset (authorization, content negotiation).
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A backend response relayed verbatim to the caller.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Parameters for registering a wallet with the backend.
///
/// The backend performs user keychain creation and multi-sig setup; the
/// gateway only contributes the backup extended public key.
#[derive(Debug, Clone)]
pub struct CreateWalletParams {
    pub label: String,
    pub passphrase: String,
    pub backup_xpub: String,
}

/// An unsigned transaction prepared by the backend.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    /// Backend-assigned draft identifier.
    pub id: String,
    /// Serialized unsigned transaction (base64).
    pub payload: String,
}

/// A draft plus the gateway's local signature, ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub draft_id: String,
    /// Serialized transaction (base64), unchanged from the draft.
    pub payload: String,
    /// DER-encoded ECDSA signature over the payload bytes (base64).
    pub signature: String,
}

/// Broadcast confirmation from the backend.
#[derive(Debug, Clone)]
pub struct BroadcastReceipt {
    /// Serialized final transaction.
    pub tx: String,
    /// Transaction hash.
    pub hash: String,
}

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The network call itself failed (connect error, timeout, bad payload).
    #[error("wallet backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a business error.
    #[error("wallet backend rejected the request ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
}

impl RemoteError {
    /// Whether the rejection names an insufficient-balance condition.
    pub fn is_insufficient_funds(&self) -> bool {
        match self {
            RemoteError::Rejected { code, message, .. } => {
                code.as_deref() == Some("insufficient_funds")
                    || message.to_lowercase().contains("insufficient funds")
            }
            RemoteError::Unavailable(_) => false,
        }
    }
}

impl From<RemoteError> for GatewayError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unavailable(msg) => GatewayError::RemoteUnavailable(msg),
            RemoteError::Rejected {
                status, message, ..
            } => GatewayError::RemoteRejected { status, message },
        }
    }
}

/// Operations the gateway delegates to the wallet backend.
#[async_trait]
pub trait RemoteWalletApi: Send + Sync {
    /// Forward a proxied request unchanged and relay the response verbatim.
    /// Any HTTP status from the backend is a successful relay; only
    /// transport failures are errors.
    async fn forward(&self, request: ForwardedRequest) -> Result<ForwardedResponse, RemoteError>;

    /// Register a wallet (user keychain, multi-sig setup) and return the
    /// backend's wallet object.
    async fn create_wallet(
        &self,
        access_token: &str,
        params: CreateWalletParams,
    ) -> Result<serde_json::Value, RemoteError>;

    /// Current recommended fee in satoshis.
    async fn recommended_fee(&self, access_token: &str) -> Result<u64, RemoteError>;

    /// Fetch the wallet's encrypted signing key (an SJCL blob the gateway
    /// decrypts locally with the wallet passphrase).
    async fn signing_key(
        &self,
        access_token: &str,
        wallet_id: &str,
    ) -> Result<String, RemoteError>;

    /// Ask the backend to assemble an unsigned transaction draft.
    async fn transaction_draft(
        &self,
        access_token: &str,
        wallet_id: &str,
        address: &str,
        amount: u64,
        fee: u64,
    ) -> Result<TransactionDraft, RemoteError>;

    /// Submit a locally signed transaction for broadcast.
    async fn broadcast(
        &self,
        access_token: &str,
        wallet_id: &str,
        transaction: SignedTransaction,
    ) -> Result<BroadcastReceipt, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_detection() {
        let by_code = RemoteError::Rejected {
            status: 400,
            code: Some("insufficient_funds".into()),
            message: "no balance".into(),
        };
        assert!(by_code.is_insufficient_funds());

        let by_message = RemoteError::Rejected {
            status: 400,
            code: None,
            message: "Insufficient funds in wallet".into(),
        };
        assert!(by_message.is_insufficient_funds());

        let other = RemoteError::Rejected {
            status: 400,
            code: Some("invalid_address".into()),
            message: "bad address".into(),
        };
        assert!(!other.is_insufficient_funds());

        let transport = RemoteError::Unavailable("timeout".into());
        assert!(!transport.is_insufficient_funds());
    }

    #[test]
    fn rejection_maps_to_remote_rejected() {
        let err: GatewayError = RemoteError::Rejected {
            status: 404,
            code: None,
            message: "no such wallet".into(),
        }
        .into();
        assert!(matches!(
            err,
            GatewayError::RemoteRejected { status: 404, .. }
        ));

        let err: GatewayError = RemoteError::Unavailable("refused".into()).into();
        assert!(matches!(err, GatewayError::RemoteUnavailable(_)));
    }
}
