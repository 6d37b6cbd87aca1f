// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Local key generation and decryption. Nothing here touches the backend;
//! key material and plaintext never leave the process boundary.

use serde_json::Value;

use crate::crypto::{self, EncryptedPayload};
use crate::error::GatewayError;
use crate::models::{DecryptRequest, DecryptResponse, Keychain};

/// `POST /keychain/local`. Generates a fresh BIP32 key pair from OS
/// randomness and returns both halves; the gateway retains nothing.
pub fn local_keychain() -> Result<Keychain, GatewayError> {
    let keychain = crypto::generate_keychain()?;
    Ok(keychain)
}

/// `POST /decrypt`. Decrypts a password-sealed payload locally.
///
/// The payload may arrive as the JSON object itself or as a string holding
/// its serialization; wallet exports use the string form.
pub fn decrypt(request: DecryptRequest) -> Result<DecryptResponse, GatewayError> {
    let payload = parse_payload(&request.input)?;
    let decrypted = crypto::decrypt(&payload, &request.password)?;
    Ok(DecryptResponse { decrypted })
}

fn parse_payload(input: &Value) -> Result<EncryptedPayload, GatewayError> {
    let parsed = match input {
        Value::String(raw) => serde_json::from_str(raw),
        other => serde_json::from_value(other.clone()),
    };
    parsed.map_err(|e| GatewayError::BadRequest(format!("malformed encrypted payload: {e}")))
}
