// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Wallet creation and spending. These are the composite operations: the
//! backend assembles wallets and drafts, the gateway contributes the local
//! crypto (backup keys, passphrase decryption, signing).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::crypto;
use crate::error::GatewayError;
use crate::models::{
    Keychain, SendCoinsRequest, SendCoinsResponse, WalletCreateRequest, WalletCreateResponse,
};
use crate::remote::{CreateWalletParams, RemoteError, SignedTransaction};
use crate::state::AppState;

/// `POST /wallets/simplecreate`.
///
/// When the caller supplies a backup xpub, the backend never sees a private
/// half and the response echoes that xpub public-only. Otherwise a fresh
/// backup keychain is generated locally and returned exactly once, private
/// key included.
pub async fn simple_create(
    state: &AppState,
    token: &str,
    request: WalletCreateRequest,
) -> Result<WalletCreateResponse, GatewayError> {
    if request.passphrase.is_empty() {
        return Err(GatewayError::BadRequest("passphrase must not be empty".into()));
    }
    if request.label.is_empty() {
        return Err(GatewayError::BadRequest("label must not be empty".into()));
    }

    let backup_keychain = match request.backup_xpub {
        Some(xpub) if !xpub.is_empty() => Keychain { xpub, xprv: None },
        _ => crypto::generate_keychain()?,
    };

    let wallet = state
        .remote
        .create_wallet(
            token,
            CreateWalletParams {
                label: request.label,
                passphrase: request.passphrase,
                backup_xpub: backup_keychain.xpub.clone(),
            },
        )
        .await?;

    Ok(WalletCreateResponse {
        wallet,
        backup_keychain,
    })
}

/// `POST /wallet/{wallet_id}/sendcoins`.
///
/// Resolve the fee, fetch and decrypt the wallet's signing key, have the
/// backend build a draft, sign it locally, broadcast. The passphrase and the
/// decrypted key live only on this stack frame.
pub async fn send_coins(
    state: &AppState,
    token: &str,
    wallet_id: &str,
    request: SendCoinsRequest,
) -> Result<SendCoinsResponse, GatewayError> {
    if request.address.is_empty() {
        return Err(GatewayError::BadRequest("address must not be empty".into()));
    }
    if request.amount == 0 {
        return Err(GatewayError::BadRequest("amount must be positive".into()));
    }

    let fee = match request.fee {
        Some(fee) => fee,
        None => state.remote.recommended_fee(token).await?,
    };

    let encrypted = state.remote.signing_key(token, wallet_id).await?;
    let payload = serde_json::from_str(&encrypted)
        .map_err(|_| GatewayError::Internal("backend returned malformed key material".into()))?;
    let xprv_encoded = crypto::decrypt(&payload, &request.wallet_passphrase)
        .map_err(|_| GatewayError::InvalidPassphrase)?;
    let xprv = crypto::parse_xprv(&xprv_encoded)?;

    let draft = state
        .remote
        .transaction_draft(token, wallet_id, &request.address, request.amount, fee)
        .await
        .map_err(balance_rejection)?;

    let draft_bytes = BASE64
        .decode(&draft.payload)
        .map_err(|_| GatewayError::Internal("backend returned a malformed draft payload".into()))?;
    let signature = BASE64.encode(crypto::sign_payload(&xprv, &draft_bytes));

    // The balance can change between draft and broadcast, so both stages can
    // reject for funds.
    let receipt = state
        .remote
        .broadcast(
            token,
            wallet_id,
            SignedTransaction {
                draft_id: draft.id,
                payload: draft.payload,
                signature,
            },
        )
        .await
        .map_err(balance_rejection)?;

    tracing::info!(wallet = %wallet_id, hash = %receipt.hash, fee, "transaction broadcast");

    Ok(SendCoinsResponse {
        tx: receipt.tx,
        hash: receipt.hash,
        fee,
    })
}

fn balance_rejection(err: RemoteError) -> GatewayError {
    if err.is_insufficient_funds() {
        GatewayError::InsufficientFunds
    } else {
        err.into()
    }
}
