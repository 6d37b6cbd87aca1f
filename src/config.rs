// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `3080` |
//! | `API_PREFIX` | Mount prefix for the route table | `/api/v1` |
//! | `BACKEND_URL` | Base URL of the remote wallet backend | Required |
//! | `BACKEND_TIMEOUT_SECS` | Per-request backend timeout | `30` |
//! | `ACCESS_TOKENS` | Recognized credentials, `token=owner` pairs joined by `,` | Empty |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{collections::HashMap, env, time::Duration};

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the route-table mount prefix.
pub const API_PREFIX_ENV: &str = "API_PREFIX";

/// Environment variable name for the wallet backend base URL.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Environment variable name for the backend request timeout in seconds.
pub const BACKEND_TIMEOUT_ENV: &str = "BACKEND_TIMEOUT_SECS";

/// Environment variable name for the recognized access-token registry.
pub const ACCESS_TOKENS_ENV: &str = "ACCESS_TOKENS";

/// Environment variable name for the log format selector.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default backend timeout when `BACKEND_TIMEOUT_SECS` is unset.
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Prefix the route table is mounted under (e.g. `/api/v1`).
    pub api_prefix: String,
    /// Base URL of the remote wallet backend.
    pub backend_url: String,
    /// Timeout applied to every backend call.
    pub backend_timeout: Duration,
    /// Recognized access tokens mapped to their owner identities.
    pub access_tokens: HashMap<String, String>,
    /// `json` or `pretty` log output.
    pub log_format: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, String),
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(HOST_ENV).unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var(PORT_ENV) {
            Ok(raw) => raw
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::Invalid(PORT_ENV, e.to_string()))?,
            Err(_) => 3080,
        };

        let api_prefix = env::var(API_PREFIX_ENV).unwrap_or_else(|_| "/api/v1".to_string());
        if !api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(
                API_PREFIX_ENV,
                "must start with '/'".to_string(),
            ));
        }

        let backend_url =
            env::var(BACKEND_URL_ENV).map_err(|_| ConfigError::Missing(BACKEND_URL_ENV))?;

        let backend_timeout = match env::var(BACKEND_TIMEOUT_ENV) {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid(BACKEND_TIMEOUT_ENV, e.to_string())
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        };

        let access_tokens = match env::var(ACCESS_TOKENS_ENV) {
            Ok(raw) => parse_access_tokens(&raw)?,
            Err(_) => HashMap::new(),
        };

        let log_format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());

        Ok(Self {
            host,
            port,
            api_prefix,
            backend_url,
            backend_timeout,
            access_tokens,
            log_format,
        })
    }
}

/// Parse the `token=owner,token=owner` registry format.
fn parse_access_tokens(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut tokens = HashMap::new();
    for pair in raw.split(',').filter(|pair| !pair.trim().is_empty()) {
        let (token, owner) = pair.split_once('=').ok_or_else(|| {
            ConfigError::Invalid(ACCESS_TOKENS_ENV, format!("expected token=owner, got {pair:?}"))
        })?;
        let (token, owner) = (token.trim(), owner.trim());
        if token.is_empty() || owner.is_empty() {
            return Err(ConfigError::Invalid(
                ACCESS_TOKENS_ENV,
                "token and owner must be non-empty".to_string(),
            ));
        }
        tokens.insert(token.to_string(), owner.to_string());
    }
    Ok(tokens)
}
