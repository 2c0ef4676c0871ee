// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Login email (unique)
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
    pub nickname: String,
    pub is_admin: bool,
    pub profile_img_url: String,
    /// Long-lived key used to mint new access tokens (unique)
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a user. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub is_admin: bool,
    pub api_key: String,
}

impl NewUser {
    /// A regular user with a freshly generated API key.
    pub fn new(email: &str, password_hash: String, nickname: &str) -> Self {
        Self {
            email: email.to_string(),
            password_hash,
            nickname: nickname.to_string(),
            is_admin: false,
            api_key: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Caller identity resolved by the authentication gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub profile_img_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            profile_img_url: user.profile_img_url.clone(),
            created_at: user.created_at,
        }
    }
}
