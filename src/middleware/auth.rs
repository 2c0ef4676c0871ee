// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication gate.
//!
//! Runs once per request. Public paths and non-API traffic pass through
//! untouched. Otherwise the presented credentials are resolved to a user:
//! a valid access token wins, and an invalid or expired token falls back to
//! the API key, in which case a fresh access token is attached to the
//! response. Requests without any credentials pass through anonymously and
//! are left to the handlers to reject.

use crate::context::ACCESS_TOKEN_COOKIE;
use crate::error::AppError;
use crate::middleware::credentials::{extract_credentials, Credentials};
use crate::models::Identity;
use crate::services::UserService;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Only paths under this prefix are gated.
pub const API_PREFIX: &str = "/api/";

/// A resolved caller.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub identity: Identity,
    /// Set when the presented access token was unusable and a new one was minted.
    pub refreshed_access_token: Option<String>,
}

/// Resolve credentials to a user.
///
/// Returns `Ok(None)` when no credentials were presented at all. Fails with
/// `404-1` when a valid token names a missing user and `404-2` when the API
/// key matches nobody.
pub fn resolve_identity(
    users: &UserService,
    credentials: &Credentials,
) -> Result<Option<Authenticated>, AppError> {
    if credentials.is_empty() {
        return Ok(None);
    }

    let has_access_token = !credentials.access_token.trim().is_empty();

    let token_user = if has_access_token {
        match users.payload(&credentials.access_token) {
            Some(payload) => Some(
                users
                    .find_by_id(payload.id)
                    .ok_or_else(|| AppError::service("404-1", "User not found"))?,
            ),
            None => None,
        }
    } else {
        None
    };
    let token_was_valid = token_user.is_some();

    let user = match token_user {
        Some(user) => user,
        None => users
            .find_by_api_key(&credentials.api_key)
            .ok_or_else(|| AppError::service("404-2", "Unknown API key"))?,
    };

    let refreshed_access_token = if has_access_token && !token_was_valid {
        tracing::debug!(user_id = user.id, "Access token refreshed from API key");
        Some(users.gen_access_token(&user)?)
    } else {
        None
    };

    Ok(Some(Authenticated {
        identity: Identity::from(&user),
        refreshed_access_token,
    }))
}

/// Middleware that resolves the caller and publishes it to the request.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if state.public_paths.matches(path) || !path.starts_with(API_PREFIX) {
        return next.run(request).await;
    }

    let outcome = extract_credentials(request.headers(), &state.cookies)
        .and_then(|credentials| resolve_identity(&state.user_service, &credentials));

    let Authenticated {
        identity,
        refreshed_access_token,
    } = match outcome {
        Ok(Some(authenticated)) => authenticated,
        Ok(None) => return next.run(request).await,
        Err(err) => {
            tracing::warn!(
                path = %request.uri().path(),
                result_code = err.result_code(),
                "Rejected request at authentication gate"
            );
            return err.into_response();
        }
    };

    request.extensions_mut().insert(identity);
    let response = next.run(request).await;

    match refreshed_access_token {
        Some(token) => {
            let jar = state.cookies.set(jar, ACCESS_TOKEN_COOKIE, Some(&token));
            (jar, [(header::AUTHORIZATION, token)], response).into_response()
        }
        None => response,
    }
}
