// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-request caller context and session cookies.
//!
//! The authentication gate stores the resolved [`Identity`] in the request
//! extensions; handlers take it explicitly through [`CurrentUser`] or
//! [`Actor`]. Session cookies are read from and written to a `CookieJar`
//! with a fixed set of security attributes.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::error::AppError;
use crate::models::Identity;

/// Cookie holding the long-lived API key.
pub const API_KEY_COOKIE: &str = "apiKey";

/// Cookie holding the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Lifetime of a non-empty session cookie.
const COOKIE_MAX_AGE: Duration = Duration::days(365);

/// Optional caller identity. Never rejects.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<Identity>().cloned()))
    }
}

/// Required caller identity. Rejects anonymous requests with `401-1`.
#[derive(Debug, Clone)]
pub struct Actor(pub Identity);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Actor)
            .ok_or_else(AppError::login_required)
    }
}

/// Builds session cookies with fixed attributes.
///
/// Every cookie is `Path=/; HttpOnly; Secure; SameSite=Strict` plus the
/// configured domain. A blank value produces `Max-Age=0`, which deletes the
/// cookie in the browser.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    domain: Option<String>,
}

impl SessionCookies {
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim();
        Self {
            domain: (!domain.is_empty()).then(|| domain.to_string()),
        }
    }

    /// Value of the named cookie, or `default` if it is absent or blank.
    pub fn get(&self, jar: &CookieJar, name: &str, default: &str) -> String {
        jar.get(name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    }

    /// Value of the first request cookie with this name, or `default` if
    /// it is absent or blank. Later duplicates are ignored.
    pub fn get_first(&self, headers: &HeaderMap, name: &str, default: &str) -> String {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn build(&self, name: &str, value: Option<&str>) -> Cookie<'static> {
        let value = value.unwrap_or_default();
        let max_age = if value.trim().is_empty() {
            Duration::ZERO
        } else {
            COOKIE_MAX_AGE
        };

        let mut builder = Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Strict)
            .max_age(max_age);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }

    pub fn set(&self, jar: CookieJar, name: &str, value: Option<&str>) -> CookieJar {
        jar.add(self.build(name, value))
    }

    pub fn delete(&self, jar: CookieJar, name: &str) -> CookieJar {
        self.set(jar, name, None)
    }
}
