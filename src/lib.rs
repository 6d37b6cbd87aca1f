// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Wallet Gateway - Local Signing Gateway
//!
//! This crate provides a local HTTP gateway that sits between a thin client
//! and a remote multi-signature wallet backend. Decrypted secrets, generated
//! key pairs, and transaction signing never leave the user's machine;
//! non-sensitive operations are forwarded to the backend unchanged.
//!
//! ## Modules
//!
//! - `api` - Route table, dispatcher, and HTTP handlers (Axum)
//! - `auth` - Session lifecycle and bearer-token authentication
//! - `crypto` - Passphrase-based decryption, keychain generation, signing
//! - `remote` - Wallet backend client (trait + reqwest implementation)

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod remote;
pub mod state;
