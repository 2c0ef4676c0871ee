// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential extraction from the Authorization header or session cookies.

use axum::http::{header, HeaderMap};

use crate::context::{SessionCookies, ACCESS_TOKEN_COOKIE, API_KEY_COOKIE};
use crate::error::AppError;

/// Credentials presented by a request. Either field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub access_token: String,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.api_key.trim().is_empty() && self.access_token.trim().is_empty()
    }
}

/// Read `Authorization: Bearer <apiKey> [<accessToken>]`, falling back to
/// the first `apiKey` / `accessToken` cookies when the header is absent or
/// blank.
///
/// A non-blank header that is not a Bearer header is rejected.
pub fn extract_credentials(
    headers: &HeaderMap,
    cookies: &SessionCookies,
) -> Result<Credentials, AppError> {
    let authorization = match headers.get(header::AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::BadRequest("Authorization header is malformed".to_string()))?,
        None => "",
    };

    if authorization.trim().is_empty() {
        return Ok(Credentials {
            api_key: cookies.get_first(headers, API_KEY_COOKIE, ""),
            access_token: cookies.get_first(headers, ACCESS_TOKEN_COOKIE, ""),
        });
    }

    let rest = authorization
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::BadRequest("Authorization header is malformed".to_string()))?;

    let (api_key, access_token) = rest.split_once(' ').unwrap_or((rest, ""));
    Ok(Credentials {
        api_key: api_key.to_string(),
        access_token: access_token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    fn extract(map: &HeaderMap) -> Result<Credentials, AppError> {
        extract_credentials(map, &SessionCookies::new("localhost"))
    }

    #[test]
    fn test_bearer_with_key_and_token() {
        let creds = extract(&headers(&[(header::AUTHORIZATION, "Bearer k1 t1")])).unwrap();
        assert_eq!(creds.api_key, "k1");
        assert_eq!(creds.access_token, "t1");
    }

    #[test]
    fn test_bearer_with_key_only() {
        let creds = extract(&headers(&[(header::AUTHORIZATION, "Bearer k1")])).unwrap();
        assert_eq!(creds.api_key, "k1");
        assert_eq!(creds.access_token, "");
    }

    #[test]
    fn test_header_takes_precedence_over_cookies() {
        let creds = extract(&headers(&[
            (header::AUTHORIZATION, "Bearer hk ht"),
            (header::COOKIE, "apiKey=ck; accessToken=ct"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key, "hk");
        assert_eq!(creds.access_token, "ht");
    }

    #[test]
    fn test_cookies_when_header_absent() {
        let creds = extract(&headers(&[(header::COOKIE, "apiKey=ck; accessToken=ct")])).unwrap();
        assert_eq!(creds.api_key, "ck");
        assert_eq!(creds.access_token, "ct");
    }

    #[test]
    fn test_blank_header_falls_back_to_cookies() {
        let creds = extract(&headers(&[
            (header::AUTHORIZATION, "   "),
            (header::COOKIE, "apiKey=ck"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key, "ck");
        assert_eq!(creds.access_token, "");
    }

    #[test]
    fn test_nothing_presented() {
        let creds = extract(&HeaderMap::new()).unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn test_non_bearer_header_rejected() {
        let err = extract(&headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
