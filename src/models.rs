// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! # API Data Models
//!
//! Request and response structures for the handled routes. Wire field names
//! follow the backend's camelCase convention so the thin client sees a
//! uniform surface whether a route is proxied or handled locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Session Models
// =============================================================================

/// Request body for `POST /user/unlock`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnlockRequest {
    /// One-time code verified against the backend.
    pub otp: String,
    /// Requested session lifetime in seconds.
    pub duration: Option<u64>,
}

/// Session details echoed back after a successful unlock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Owner identity the session was granted to.
    pub client: String,
    /// Wall-clock creation time.
    pub unlocked_at: DateTime<Utc>,
    /// Wall-clock expiry time.
    pub expires: DateTime<Utc>,
}

/// Response body for `POST /user/unlock`.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockResponse {
    pub session: SessionInfo,
}

// =============================================================================
// Keychain Models
// =============================================================================

/// An extended public/private key pair.
///
/// The private half is omitted from serialization when absent, e.g. when the
/// caller supplied only a backup xpub during wallet creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Keychain {
    /// Extended public key (base58check, `xpub...`).
    pub xpub: String,
    /// Extended private key (base58check, `xprv...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xprv: Option<String>,
}

// =============================================================================
// Wallet Models
// =============================================================================

/// Request body for `POST /wallets/simplecreate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreateRequest {
    /// Passphrase protecting the wallet's user key on the backend.
    pub passphrase: String,
    /// Human-readable wallet label.
    pub label: String,
    /// Backup extended public key. When absent the gateway generates a
    /// fresh backup keychain and returns it (private key included) once.
    pub backup_xpub: Option<String>,
}

/// Response body for `POST /wallets/simplecreate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreateResponse {
    /// The registered wallet, as returned by the backend.
    pub wallet: serde_json::Value,
    /// The backup keychain. This is the only moment the private key is
    /// visible; the gateway does not retain it.
    pub backup_keychain: Keychain,
}

// =============================================================================
// Transaction Models
// =============================================================================

/// Request body for `POST /wallet/{wallet_id}/sendcoins`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinsRequest {
    /// Destination address.
    pub address: String,
    /// Amount in satoshis.
    pub amount: u64,
    /// Passphrase unlocking the wallet's encrypted signing key.
    pub wallet_passphrase: String,
    /// Explicit fee in satoshis. Absent means the backend's estimate applies.
    pub fee: Option<u64>,
}

/// Response body for `POST /wallet/{wallet_id}/sendcoins`.
#[derive(Debug, Clone, Serialize)]
pub struct SendCoinsResponse {
    /// Serialized signed transaction.
    pub tx: String,
    /// Transaction hash assigned on broadcast.
    pub hash: String,
    /// Fee actually used, echoed verbatim when the caller supplied one.
    pub fee: u64,
}

// =============================================================================
// Decrypt Models
// =============================================================================

/// Request body for `POST /decrypt`.
///
/// `input` accepts either the encrypted payload object itself or a string
/// containing its JSON serialization (the form wallet exports use).
#[derive(Debug, Clone, Deserialize)]
pub struct DecryptRequest {
    pub input: serde_json::Value,
    pub password: String,
}

/// Response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize)]
pub struct DecryptResponse {
    pub decrypted: String,
}

// =============================================================================
// Health Models
// =============================================================================

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keychain_omits_absent_private_key() {
        let public_only = Keychain {
            xpub: "xpub6AHA9hZ".into(),
            xprv: None,
        };
        let json = serde_json::to_value(&public_only).unwrap();
        assert_eq!(json["xpub"], "xpub6AHA9hZ");
        assert!(json.get("xprv").is_none());

        let full = Keychain {
            xpub: "xpub6AHA9hZ".into(),
            xprv: Some("xprv9wHokC2".into()),
        };
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["xprv"], "xprv9wHokC2");
    }

    #[test]
    fn send_coins_request_uses_camel_case() {
        let body = serde_json::json!({
            "address": "msj42CCGruhRsFrGATiUuh25dtxYtnpbTx",
            "amount": 100_000u64,
            "walletPassphrase": "secret",
            "fee": 500_000u64,
        });
        let req: SendCoinsRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.wallet_passphrase, "secret");
        assert_eq!(req.fee, Some(500_000));
    }

    #[test]
    fn wallet_create_request_backup_xpub_is_optional() {
        let body = serde_json::json!({ "passphrase": "abc", "label": "helloworld" });
        let req: WalletCreateRequest = serde_json::from_value(body).unwrap();
        assert!(req.backup_xpub.is_none());
    }
}
