// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! BIP32 extended key pairs and local draft signing.

use bip32::{Prefix, XPrv};
use k256::ecdsa::{signature::Signer, Signature};
use rand::{rngs::OsRng, RngCore};

use super::CryptoError;
use crate::models::Keychain;

/// Generate a fresh extended key pair from 64 bytes of OS randomness.
///
/// The pair is returned to the caller and never retained; persistence, if
/// any, is the backend's concern.
pub fn generate_keychain() -> Result<Keychain, CryptoError> {
    let mut seed = [0u8; 64];
    OsRng.fill_bytes(&mut seed);

    let xprv = XPrv::new(seed).map_err(|e| CryptoError::KeyMaterial(e.to_string()))?;
    let xpub = xprv.public_key().to_string(Prefix::XPUB);
    let xprv_encoded = xprv.to_string(Prefix::XPRV);

    Ok(Keychain {
        xpub,
        xprv: Some(xprv_encoded.as_str().to_owned()),
    })
}

/// Parse a base58check-encoded extended private key.
pub fn parse_xprv(encoded: &str) -> Result<XPrv, CryptoError> {
    encoded
        .trim()
        .parse::<XPrv>()
        .map_err(|_| CryptoError::KeyMaterial("invalid extended private key".into()))
}

/// Sign a draft-transaction payload with the wallet's signing key.
///
/// Returns the DER-encoded ECDSA signature over the payload bytes.
pub fn sign_payload(xprv: &XPrv, payload: &[u8]) -> Vec<u8> {
    let signature: Signature = xprv.private_key().sign(payload);
    signature.to_der().as_bytes().to_vec()
}
