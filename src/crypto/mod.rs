// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! # Local Cryptographic Operations
//!
//! Everything in this module runs on the user's machine. Nothing here keeps
//! state across requests, and nothing here touches the network.
//!
//! - `sjcl` - passphrase-based authenticated encryption in the SJCL JSON
//!   format the wallet ecosystem uses for key-material exports
//! - `keychain` - BIP32 extended key pair generation and draft signing

pub mod keychain;
pub mod sjcl;

pub use keychain::{generate_keychain, parse_xprv, sign_payload};
pub use sjcl::{decrypt, encrypt, EncryptedPayload};

/// Errors from local cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Authentication-tag mismatch or malformed payload. Deliberately
    /// carries no detail; callers learn nothing about how far decryption got.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Key material could not be generated or parsed.
    #[error("key material error: {0}")]
    KeyMaterial(String),
}

impl From<CryptoError> for crate::error::GatewayError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::DecryptionFailed => crate::error::GatewayError::DecryptionFailed,
            CryptoError::KeyMaterial(msg) => crate::error::GatewayError::Internal(msg),
        }
    }
}
