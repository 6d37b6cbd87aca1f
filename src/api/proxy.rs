// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! Verbatim forwarding of proxied routes to the wallet backend.

use axum::{
    body::Body,
    http::{header, request::Parts, StatusCode},
    response::Response,
};

use crate::error::GatewayError;
use crate::remote::ForwardedRequest;
use crate::state::AppState;

/// Headers copied onto the forwarded request. Everything else (cookies, host,
/// connection headers) stays behind.
const FORWARDED_HEADERS: &[header::HeaderName] = &[
    header::AUTHORIZATION,
    header::CONTENT_TYPE,
    header::ACCEPT,
];

/// Forward the request to the backend and relay its response unchanged:
/// same status, same body, same content type. Backend error statuses are a
/// successful relay, not a gateway failure.
pub async fn forward(
    state: &AppState,
    parts: Parts,
    body: Body,
) -> Result<Response, GatewayError> {
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let headers = FORWARDED_HEADERS
        .iter()
        .filter_map(|name| {
            let value = parts.headers.get(name)?.to_str().ok()?;
            Some((name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let body = axum::body::to_bytes(body, super::MAX_BODY_BYTES)
        .await
        .map_err(|e| GatewayError::BadRequest(format!("failed to read body: {e}")))?
        .to_vec();

    let forwarded = ForwardedRequest {
        method: parts.method.clone(),
        path_and_query,
        headers,
        body,
    };

    tracing::debug!(method = %parts.method, path = %forwarded.path_and_query, "forwarding to backend");
    let upstream = state.remote.forward(forwarded).await?;

    let mut builder = Response::builder().status(
        StatusCode::from_u16(upstream.status)
            .map_err(|_| GatewayError::Internal("backend returned an invalid status".into()))?,
    );
    if let Some(content_type) = &upstream.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(upstream.body))
        .map_err(|e| GatewayError::Internal(format!("failed to relay backend response: {e}")))
}
