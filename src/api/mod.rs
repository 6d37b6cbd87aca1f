// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Wallet Gateway Developers

//! # Request Router
//!
//! A static route table drives dispatch. Each entry carries a visibility
//! (public or protected) and a handling mode (proxy or a local handler), and
//! the table is resolved into an axum [`Router`] once at startup, so there is
//! no string branching inside request handling.
//!
//! Dispatch order is fixed and fail-closed:
//!
//! 1. Method + path match (most specific wins; unmatched is a local 404,
//!    never forwarded upstream).
//! 2. Protected routes pass the session gate before the body is read and
//!    before any proxying or handler logic. The unlock route authenticates
//!    by owner recognition instead, because it is the operation that mints
//!    sessions.
//! 3. Proxied routes forward method, path, query, body, and a restricted
//!    header set, then relay the backend response verbatim.
//! 4. Handled routes parse the body and run the local handler.

pub mod keychain;
pub mod proxy;
pub mod user;
pub mod wallets;

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, RawPathParams, Request, State},
    http::header::AUTHORIZATION,
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    error::GatewayError,
    models::{DecryptRequest, HealthResponse, SendCoinsRequest, UnlockRequest, WalletCreateRequest},
    state::AppState,
};

/// Largest request body a handled route will read.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Route visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// No credential required.
    Public,
    /// Bearer credential required; the session gate runs before anything else.
    Protected,
}

/// How a matched route is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Forwarded to the backend and relayed verbatim.
    Proxy,
    /// Served by a local handler.
    Handled(HandlerKind),
}

/// Local handlers referenced from the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Unlock,
    SimpleCreate,
    LocalKeychain,
    Decrypt,
    SendCoins,
    Health,
}

/// HTTP methods the table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
}

impl RouteMethod {
    fn filter(self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Put => MethodFilter::PUT,
        }
    }
}

/// One entry in the route table.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub method: RouteMethod,
    pub path: &'static str,
    pub visibility: Visibility,
    pub mode: Mode,
}

/// The gateway's entire HTTP surface. Resolved into a router once at
/// startup; anything not listed here is a local 404.
pub const ROUTES: &[Route] = &[
    Route {
        method: RouteMethod::Get,
        path: "/wallet",
        visibility: Visibility::Protected,
        mode: Mode::Proxy,
    },
    Route {
        method: RouteMethod::Get,
        path: "/market/latest",
        visibility: Visibility::Public,
        mode: Mode::Proxy,
    },
    Route {
        method: RouteMethod::Post,
        path: "/user/unlock",
        visibility: Visibility::Protected,
        mode: Mode::Handled(HandlerKind::Unlock),
    },
    Route {
        method: RouteMethod::Put,
        path: "/labels/{wallet_id}/{address}",
        visibility: Visibility::Protected,
        mode: Mode::Proxy,
    },
    Route {
        method: RouteMethod::Post,
        path: "/wallets/simplecreate",
        visibility: Visibility::Protected,
        mode: Mode::Handled(HandlerKind::SimpleCreate),
    },
    Route {
        method: RouteMethod::Post,
        path: "/keychain/local",
        visibility: Visibility::Public,
        mode: Mode::Handled(HandlerKind::LocalKeychain),
    },
    Route {
        method: RouteMethod::Post,
        path: "/decrypt",
        visibility: Visibility::Public,
        mode: Mode::Handled(HandlerKind::Decrypt),
    },
    Route {
        method: RouteMethod::Post,
        path: "/wallet/{wallet_id}/sendcoins",
        visibility: Visibility::Protected,
        mode: Mode::Handled(HandlerKind::SendCoins),
    },
    Route {
        method: RouteMethod::Get,
        path: "/health",
        visibility: Visibility::Public,
        mode: Mode::Handled(HandlerKind::Health),
    },
];

/// Build the gateway router from the route table.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new();
    for route in ROUTES {
        router = router.route(
            route.path,
            on(
                route.method.filter(),
                move |State(state): State<AppState>, request: Request| {
                    dispatch(route, state, request)
                },
            ),
        );
    }

    router
        .fallback(unmatched)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn unmatched() -> GatewayError {
    GatewayError::NotFound
}

async fn dispatch(route: &'static Route, state: AppState, request: Request) -> Response {
    match serve(route, state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn serve(
    route: &'static Route,
    state: AppState,
    request: Request,
) -> Result<Response, GatewayError> {
    let (mut parts, body) = request.into_parts();
    let credential = bearer_token(&parts.headers);

    // The auth gate runs before the body is read, before any proxying, and
    // before any handler logic. No exceptions.
    if route.visibility == Visibility::Protected {
        let token = credential.as_deref().ok_or(GatewayError::Unauthenticated)?;
        match route.mode {
            // Unlock mints sessions, so it cannot require one; it
            // authenticates by recognizing the access token itself.
            Mode::Handled(HandlerKind::Unlock) => {
                state.sessions.identify(token)?;
            }
            _ => {
                state.sessions.validate(token).await?;
            }
        }
    }

    match route.mode {
        Mode::Proxy => proxy::forward(&state, parts, body).await,
        Mode::Handled(kind) => {
            let path_params = extract_path_params(&mut parts).await?;
            let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
                .await
                .map_err(|e| GatewayError::BadRequest(format!("failed to read body: {e}")))?;
            handle(kind, &state, credential, &path_params, &bytes).await
        }
    }
}

async fn handle(
    kind: HandlerKind,
    state: &AppState,
    credential: Option<String>,
    path_params: &HashMap<String, String>,
    body: &[u8],
) -> Result<Response, GatewayError> {
    match kind {
        HandlerKind::Unlock => {
            let token = credential.ok_or(GatewayError::Unauthenticated)?;
            let request: UnlockRequest = parse_json(body)?;
            let response = user::unlock(state, &token, request).await?;
            Ok(Json(response).into_response())
        }
        HandlerKind::SimpleCreate => {
            let token = credential.ok_or(GatewayError::Unauthenticated)?;
            let request: WalletCreateRequest = parse_json(body)?;
            let response = wallets::simple_create(state, &token, request).await?;
            Ok(Json(response).into_response())
        }
        HandlerKind::LocalKeychain => {
            let response = keychain::local_keychain()?;
            Ok(Json(response).into_response())
        }
        HandlerKind::Decrypt => {
            let request: DecryptRequest = parse_json(body)?;
            let response = keychain::decrypt(request)?;
            Ok(Json(response).into_response())
        }
        HandlerKind::SendCoins => {
            let token = credential.ok_or(GatewayError::Unauthenticated)?;
            let wallet_id = path_params
                .get("wallet_id")
                .ok_or(GatewayError::NotFound)?;
            let request: SendCoinsRequest = parse_json(body)?;
            let response = wallets::send_coins(state, &token, wallet_id, request).await?;
            Ok(Json(response).into_response())
        }
        HandlerKind::Health => {
            let response = HealthResponse {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
            };
            Ok(Json(response).into_response())
        }
    }
}

/// Extract the bearer credential, if any.
fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

async fn extract_path_params(
    parts: &mut axum::http::request::Parts,
) -> Result<HashMap<String, String>, GatewayError> {
    let raw = RawPathParams::from_request_parts(parts, &())
        .await
        .map_err(|_| GatewayError::NotFound)?;
    Ok(raw
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect())
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    let body = if body.is_empty() { b"{}" as &[u8] } else { body };
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::BadRequest(format!("invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn route_table_covers_the_full_surface() {
        assert_eq!(ROUTES.len(), 9);

        let protected = ROUTES
            .iter()
            .filter(|route| route.visibility == Visibility::Protected)
            .count();
        assert_eq!(protected, 5);

        // Pure local computations stay reachable without a session.
        let decrypt = ROUTES.iter().find(|s| s.path == "/decrypt").unwrap();
        assert_eq!(decrypt.visibility, Visibility::Public);
        let local = ROUTES.iter().find(|s| s.path == "/keychain/local").unwrap();
        assert_eq!(local.visibility, Visibility::Public);
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn empty_body_parses_as_empty_object() {
        let parsed: serde_json::Value = parse_json(b"").unwrap();
        assert_eq!(parsed, serde_json::json!({}));

        let err = parse_json::<UnlockRequest>(b"not json").unwrap_err();
        assert!(matches!(err, GatewayError::BadRequest(_)));
    }
}
