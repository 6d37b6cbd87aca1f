// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! reqwest-backed implementation of the backend client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use super::{
    BroadcastReceipt, CreateWalletParams, ForwardedRequest, ForwardedResponse, RemoteError,
    RemoteWalletApi, SignedTransaction, TransactionDraft,
};
use crate::auth::OtpVerifier;
use crate::config::Config;
use crate::error::GatewayError;

/// HTTP client for the wallet backend.
///
/// Every call carries the builder-level timeout from configuration; a timeout
/// or connect failure surfaces as [`RemoteError::Unavailable`], never as a
/// hang.
pub struct HttpRemoteClient {
    base: Url,
    http: Client,
}

impl HttpRemoteClient {
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        // Normalize to a trailing slash so Url::join treats the final
        // segment as a directory.
        let mut base = config.backend_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)
            .map_err(|e| RemoteError::Unavailable(format!("invalid backend URL: {e}")))?;

        let http = Client::builder()
            .timeout(config.backend_timeout)
            .build()
            .map_err(|e| RemoteError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base, http })
    }

    fn url(&self, path: &str) -> Result<Url, RemoteError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| RemoteError::Unavailable(format!("invalid backend path: {e}")))
    }

    fn transport(err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Unavailable(format!("backend timed out: {err}"))
        } else {
            RemoteError::Unavailable(format!("backend unreachable: {err}"))
        }
    }

    /// Decode a typed-call response, turning non-success statuses into
    /// structured rejections. The backend's error text is carried along but
    /// never interpreted as transport success.
    async fn decode(response: reqwest::Response) -> Result<Value, RemoteError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(Self::transport)?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(|e| {
                RemoteError::Unavailable(format!("backend returned malformed JSON: {e}"))
            });
        }

        let (code, message) = match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => (
                body.get("error_code")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("backend error")
                    .to_string(),
            ),
            Err(_) => (None, String::from_utf8_lossy(&bytes).into_owned()),
        };

        Err(RemoteError::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn get_json(&self, access_token: &str, path: &str) -> Result<Value, RemoteError> {
        let response = self
            .http
            .get(self.url(path)?)
            .bearer_auth(access_token)
            .header("x-request-id", Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    async fn post_json(
        &self,
        access_token: &str,
        path: &str,
        body: Value,
    ) -> Result<Value, RemoteError> {
        let response = self
            .http
            .post(self.url(path)?)
            .bearer_auth(access_token)
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }
}

#[async_trait]
impl RemoteWalletApi for HttpRemoteClient {
    async fn forward(&self, request: ForwardedRequest) -> Result<ForwardedResponse, RemoteError> {
        let url = self.url(&request.path_and_query)?;

        let mut builder = self.http.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(Self::transport)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(Self::transport)?.to_vec();

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }

    async fn create_wallet(
        &self,
        access_token: &str,
        params: CreateWalletParams,
    ) -> Result<Value, RemoteError> {
        let body = json!({
            "label": params.label,
            "passphrase": params.passphrase,
            "backupXpub": params.backup_xpub,
        });
        let response = self.post_json(access_token, "wallet", body).await?;
        Ok(response
            .get("wallet")
            .cloned()
            .unwrap_or(response))
    }

    async fn recommended_fee(&self, access_token: &str) -> Result<u64, RemoteError> {
        let response = self.get_json(access_token, "tx/fee").await?;
        response
            .get("fee")
            .and_then(Value::as_u64)
            .ok_or_else(|| RemoteError::Unavailable("backend fee estimate was malformed".into()))
    }

    async fn signing_key(
        &self,
        access_token: &str,
        wallet_id: &str,
    ) -> Result<String, RemoteError> {
        let response = self
            .get_json(access_token, &format!("wallet/{wallet_id}/signingkey"))
            .await?;
        response
            .get("encryptedXprv")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                RemoteError::Unavailable("backend returned malformed key material".into())
            })
    }

    async fn transaction_draft(
        &self,
        access_token: &str,
        wallet_id: &str,
        address: &str,
        amount: u64,
        fee: u64,
    ) -> Result<TransactionDraft, RemoteError> {
        let body = json!({
            "address": address,
            "amount": amount,
            "fee": fee,
        });
        let response = self
            .post_json(access_token, &format!("wallet/{wallet_id}/tx/build"), body)
            .await?;

        let id = response
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let payload = response
            .get("payload")
            .and_then(Value::as_str)
            .map(str::to_string);

        match (id, payload) {
            (Some(id), Some(payload)) => Ok(TransactionDraft { id, payload }),
            _ => Err(RemoteError::Unavailable(
                "backend returned a malformed transaction draft".into(),
            )),
        }
    }

    async fn broadcast(
        &self,
        access_token: &str,
        wallet_id: &str,
        transaction: SignedTransaction,
    ) -> Result<BroadcastReceipt, RemoteError> {
        let body = json!({
            "draftId": transaction.draft_id,
            "payload": transaction.payload,
            "signature": transaction.signature,
        });
        let response = self
            .post_json(access_token, &format!("wallet/{wallet_id}/tx/send"), body)
            .await?;

        let tx = response
            .get("tx")
            .and_then(Value::as_str)
            .map(str::to_string);
        let hash = response
            .get("hash")
            .and_then(Value::as_str)
            .map(str::to_string);

        match (tx, hash) {
            (Some(tx), Some(hash)) => Ok(BroadcastReceipt { tx, hash }),
            _ => Err(RemoteError::Unavailable(
                "backend returned a malformed broadcast receipt".into(),
            )),
        }
    }
}

#[async_trait]
impl OtpVerifier for HttpRemoteClient {
    async fn verify_otp(&self, access_token: &str, otp: &str) -> Result<bool, GatewayError> {
        let body = json!({ "otp": otp });
        match self.post_json(access_token, "user/verifyotp", body).await {
            Ok(_) => Ok(true),
            Err(RemoteError::Rejected { status, .. }) if status == 400 || status == 401 => {
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn test_config(backend_url: &str) -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 0,
            api_prefix: "/api/v1".into(),
            backend_url: backend_url.into(),
            backend_timeout: Duration::from_millis(200),
            access_tokens: HashMap::new(),
            log_format: "pretty".into(),
        }
    }

    #[test]
    fn url_join_preserves_base_path() {
        let client = HttpRemoteClient::new(&test_config("https://backend.test/api/v1")).unwrap();
        let url = client.url("/wallet").unwrap();
        assert_eq!(url.as_str(), "https://backend.test/api/v1/wallet");

        let url = client.url("wallet/abc/tx/build").unwrap();
        assert_eq!(url.as_str(), "https://backend.test/api/v1/wallet/abc/tx/build");
    }

    #[test]
    fn invalid_backend_url_is_rejected() {
        assert!(HttpRemoteClient::new(&test_config("not a url")).is_err());
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_unavailable() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let client = HttpRemoteClient::new(&test_config("http://192.0.2.1:9/api/v1")).unwrap();
        let err = client.recommended_fee("token").await.unwrap_err();
        assert!(matches!(err, RemoteError::Unavailable(_)));
    }
}
