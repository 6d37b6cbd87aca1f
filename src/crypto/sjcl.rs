// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! SJCL-format authenticated encryption.
//!
//! Wallet key material travels as a self-describing JSON structure carrying
//! every parameter needed to reverse the encryption: PBKDF2-SHA256 key
//! derivation (salt, iteration count, key size) followed by AES-CCM
//! (IV, tag size, additional authenticated data). The format matches the
//! Stanford JS Crypto Library output the rest of the wallet ecosystem
//! produces, so blobs decrypt interchangeably.

use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ccm::{
    aead::{
        generic_array::{typenum::Unsigned, GenericArray},
        Aead, KeyInit, Payload,
    },
    consts::{U12, U13, U16, U8},
    Ccm,
};
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::CryptoError;

/// CCM with a two-byte length field covers messages below 64 KiB, which is
/// every key-material blob in practice. The nonce is the IV clamped to
/// 15 - 2 = 13 bytes.
const CCM_NONCE_LEN: usize = 13;
const MAX_CCM_MESSAGE: usize = 1 << 16;

/// Sealing parameters for [`encrypt`]; mirrors what the wallet clients emit.
const SEAL_ITERATIONS: u32 = 10_000;
const SEAL_SALT_LEN: usize = 8;
const SEAL_IV_LEN: usize = 16;

/// A self-describing encrypted blob.
///
/// Immutable once received; every field required to reverse the encryption
/// is embedded, with no side channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedPayload {
    /// Initialization vector (base64).
    pub iv: String,
    /// Format version; only version 1 exists.
    pub v: u32,
    /// PBKDF2 iteration count.
    pub iter: u32,
    /// Key size in bits (128, 192, or 256).
    pub ks: u32,
    /// Authentication tag size in bits (64, 96, or 128).
    pub ts: u32,
    /// Block mode; only "ccm" is supported.
    pub mode: String,
    /// Additional authenticated data (base64).
    pub adata: String,
    /// Cipher identifier; only "aes" is supported.
    pub cipher: String,
    /// PBKDF2 salt (base64).
    pub salt: String,
    /// Ciphertext with the authentication tag appended (base64).
    pub ct: String,
}

/// Decrypt a payload with the supplied password.
///
/// Fails with [`CryptoError::DecryptionFailed`] on tag mismatch or any
/// malformed field; no partial plaintext ever escapes.
pub fn decrypt(payload: &EncryptedPayload, password: &str) -> Result<String, CryptoError> {
    if payload.v != 1 || payload.cipher != "aes" || payload.mode != "ccm" || payload.iter == 0 {
        return Err(CryptoError::DecryptionFailed);
    }

    let iv = decode_b64(&payload.iv)?;
    let salt = decode_b64(&payload.salt)?;
    let adata = decode_b64(&payload.adata)?;
    let ct = decode_b64(&payload.ct)?;

    let tag_len = (payload.ts / 8) as usize;
    if ct.len() <= tag_len || ct.len() - tag_len >= MAX_CCM_MESSAGE {
        return Err(CryptoError::DecryptionFailed);
    }
    // The nonce is the IV clamped to 13 bytes (L = 2). SJCL can also grow
    // the length field for IVs shorter than 13 bytes; wallet exports always
    // carry 16-byte IVs, so short-IV blobs are rejected rather than opened
    // with a wider length field.
    if iv.len() < CCM_NONCE_LEN {
        return Err(CryptoError::DecryptionFailed);
    }

    let key = derive_key(password, &salt, payload.iter, payload.ks)?;
    let nonce = &iv[..CCM_NONCE_LEN];

    let plaintext = ccm_open(payload.ks, payload.ts, &key, nonce, &adata, &ct)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

/// Seal a plaintext under a password, producing a payload that [`decrypt`]
/// (and every SJCL-compatible client) can reverse.
pub fn encrypt(plaintext: &str, password: &str) -> Result<EncryptedPayload, CryptoError> {
    if plaintext.len() >= MAX_CCM_MESSAGE {
        return Err(CryptoError::KeyMaterial(
            "plaintext too large for a two-byte CCM length field".into(),
        ));
    }

    let mut salt = [0u8; SEAL_SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; SEAL_IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(password, &salt, SEAL_ITERATIONS, 256)?;
    let ct = ccm_seal_256_64(&key, &iv[..CCM_NONCE_LEN], plaintext.as_bytes())?;

    Ok(EncryptedPayload {
        iv: BASE64.encode(iv),
        v: 1,
        iter: SEAL_ITERATIONS,
        ks: 256,
        ts: 64,
        mode: "ccm".to_string(),
        adata: String::new(),
        cipher: "aes".to_string(),
        salt: BASE64.encode(salt),
        ct: BASE64.encode(ct),
    })
}

fn derive_key(password: &str, salt: &[u8], iter: u32, ks: u32) -> Result<Vec<u8>, CryptoError> {
    if !matches!(ks, 128 | 192 | 256) {
        return Err(CryptoError::DecryptionFailed);
    }
    let mut key = vec![0u8; (ks / 8) as usize];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iter, &mut key);
    Ok(key)
}

/// Base64 decoding tolerant of omitted trailing padding.
fn decode_b64(field: &str) -> Result<Vec<u8>, CryptoError> {
    let mut s = field.trim().to_string();
    while s.len() % 4 != 0 {
        s.push('=');
    }
    BASE64.decode(s).map_err(|_| CryptoError::DecryptionFailed)
}

fn ccm_open(
    ks: u32,
    ts: u32,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ct: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    match (ks, ts) {
        (128, 64) => open_with::<Ccm<Aes128, U8, U13>>(key, nonce, aad, ct),
        (128, 96) => open_with::<Ccm<Aes128, U12, U13>>(key, nonce, aad, ct),
        (128, 128) => open_with::<Ccm<Aes128, U16, U13>>(key, nonce, aad, ct),
        (192, 64) => open_with::<Ccm<Aes192, U8, U13>>(key, nonce, aad, ct),
        (192, 96) => open_with::<Ccm<Aes192, U12, U13>>(key, nonce, aad, ct),
        (192, 128) => open_with::<Ccm<Aes192, U16, U13>>(key, nonce, aad, ct),
        (256, 64) => open_with::<Ccm<Aes256, U8, U13>>(key, nonce, aad, ct),
        (256, 96) => open_with::<Ccm<Aes256, U12, U13>>(key, nonce, aad, ct),
        (256, 128) => open_with::<Ccm<Aes256, U16, U13>>(key, nonce, aad, ct),
        _ => Err(CryptoError::DecryptionFailed),
    }
}

fn open_with<C>(key: &[u8], nonce: &[u8], aad: &[u8], ct: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    C: Aead + KeyInit,
{
    if nonce.len() != C::NonceSize::to_usize() {
        return Err(CryptoError::DecryptionFailed);
    }
    let cipher = C::new_from_slice(key).map_err(|_| CryptoError::DecryptionFailed)?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), Payload { msg: ct, aad })
        .map_err(|_| CryptoError::DecryptionFailed)
}

fn ccm_seal_256_64(key: &[u8], nonce: &[u8], msg: &[u8]) -> Result<Vec<u8>, CryptoError> {
    type Sealer = Ccm<Aes256, U8, U13>;
    let cipher =
        Sealer::new_from_slice(key).map_err(|e| CryptoError::KeyMaterial(e.to_string()))?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), Payload { msg, aad: b"" })
        .map_err(|e| CryptoError::KeyMaterial(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_payload() -> EncryptedPayload {
        serde_json::from_str(
            r#"{"iv":"n4zHXVTi/Go/riCP8fNs/A==","v":1,"iter":10000,"ks":256,"ts":64,"mode":"ccm","adata":"","cipher":"aes","salt":"zvLyve+4AJU=","ct":"gNMqheicMoD8ZmNzRwuQfWGAh+HA933l"}"#,
        )
        .unwrap()
    }

    #[test]
    fn decrypts_reference_blob() {
        let payload = reference_payload();
        let plaintext = decrypt(&payload, "password").unwrap();
        assert_eq!(plaintext, "this is a secret");
    }

    #[test]
    fn wrong_password_fails_closed() {
        let payload = reference_payload();
        let err = decrypt(&payload, "Password").unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed));
    }

    #[test]
    fn single_bit_ciphertext_mutation_fails() {
        let payload = reference_payload();
        let mut ct = decode_b64(&payload.ct).unwrap();
        for i in 0..ct.len() {
            ct[i] ^= 0x01;
            let mutated = EncryptedPayload {
                ct: BASE64.encode(&ct),
                ..payload.clone()
            };
            assert!(
                decrypt(&mutated, "password").is_err(),
                "flip at byte {i} slipped through"
            );
            ct[i] ^= 0x01;
        }
    }

    #[test]
    fn unsupported_parameters_are_rejected() {
        let mut payload = reference_payload();
        payload.mode = "gcm".to_string();
        assert!(decrypt(&payload, "password").is_err());

        let mut payload = reference_payload();
        payload.cipher = "des".to_string();
        assert!(decrypt(&payload, "password").is_err());

        let mut payload = reference_payload();
        payload.ks = 512;
        assert!(decrypt(&payload, "password").is_err());

        let mut payload = reference_payload();
        payload.iter = 0;
        assert!(decrypt(&payload, "password").is_err());
    }

    #[test]
    fn short_iv_payloads_are_rejected() {
        let mut payload = reference_payload();
        payload.iv = BASE64.encode([0u8; 8]);
        assert!(matches!(
            decrypt(&payload, "password").unwrap_err(),
            CryptoError::DecryptionFailed
        ));
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let mut payload = reference_payload();
        payload.ct = BASE64.encode([0u8; 8]); // tag-sized, no message
        assert!(decrypt(&payload, "password").is_err());
    }

    #[test]
    fn seal_then_open_round_trips() {
        let sealed = encrypt("xprv9wHokC2KXdTSpEepFcu53hMDUHYfAtTaLEJEMyxBPAMf78hJg17WhL5FyeDUQH5KWmGjGgEb2j74gsZqgupWpPbZgP6uFmP8MYEy5BNbyET", "chamchatka").unwrap();
        assert_eq!(sealed.v, 1);
        assert_eq!(sealed.mode, "ccm");
        assert_eq!(sealed.ks, 256);

        let opened = decrypt(&sealed, "chamchatka").unwrap();
        assert!(opened.starts_with("xprv9wHokC2"));

        assert!(decrypt(&sealed, "wrong").is_err());
    }

    #[test]
    fn sealing_uses_fresh_randomness() {
        let a = encrypt("same plaintext", "pw").unwrap();
        let b = encrypt("same plaintext", "pw").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.ct, b.ct);
    }

    #[test]
    fn unpadded_base64_is_accepted() {
        let mut payload = reference_payload();
        payload.iv = payload.iv.trim_end_matches('=').to_string();
        payload.salt = payload.salt.trim_end_matches('=').to_string();
        assert_eq!(decrypt(&payload, "password").unwrap(), "this is a secret");
    }
}
