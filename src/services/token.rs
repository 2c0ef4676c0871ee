// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token issuance and verification (HS256 JWT).
//!
//! Tokens are stateless: nothing is stored server-side, and a token that
//! fails verification is a normal outcome rather than an error.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// User id
    pub id: i64,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Identity claims carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub id: i64,
    pub email: String,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Issue a token for the user, valid from now for the configured TTL.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AppError> {
        self.issue_at(user_id, email, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, user_id: i64, email: &str, issued_at: i64) -> Result<String, AppError> {
        let claims = AccessClaims {
            id: user_id,
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))
    }

    /// Verify signature and expiry. Any failure yields `None`.
    pub fn verify_and_extract(&self, token: &str) -> Option<TokenPayload> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<AccessClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(TokenPayload {
                id: data.claims.id,
                email: data.claims.email,
            }),
            Err(e) => {
                tracing::debug!(reason = %e, "Access token rejected");
                None
            }
        }
    }
}
