// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User lookups and account operations.

use std::sync::Arc;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use crate::services::token::{TokenPayload, TokenService};

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Resolves users from storage and handles registration and login checks.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    // ─── Resolver ────────────────────────────────────────────────

    pub fn find_by_id(&self, id: i64) -> Option<User> {
        self.users.find_by_id(id)
    }

    pub fn find_by_api_key(&self, api_key: &str) -> Option<User> {
        self.users.find_by_api_key(api_key)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.find_by_email(email)
    }

    // ─── Tokens ──────────────────────────────────────────────────

    pub fn gen_access_token(&self, user: &User) -> Result<String> {
        self.tokens.issue(user.id, &user.email)
    }

    pub fn payload(&self, access_token: &str) -> Option<TokenPayload> {
        self.tokens.verify_and_extract(access_token)
    }

    // ─── Account ─────────────────────────────────────────────────

    /// Register a new user with a hashed password and a fresh API key.
    pub fn join(&self, email: &str, password: &str, nickname: &str) -> Result<User> {
        if self.users.find_by_email(email).is_some() {
            return Err(AppError::service("409-1", "Email is already registered"));
        }

        let password_hash = bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bcrypt hash: {e}")))?;

        let user = self
            .users
            .insert(NewUser::new(email, password_hash, nickname))?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Fails with `400-1` when the password does not match.
    pub fn check_password(&self, user: &User, password: &str) -> Result<()> {
        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bcrypt verify: {e}")))?;
        if !matches {
            return Err(AppError::service("400-1", "Password does not match"));
        }
        Ok(())
    }

    pub fn update_profile(
        &self,
        user_id: i64,
        nickname: &str,
        profile_img_url: &str,
    ) -> Result<User> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .ok_or_else(|| AppError::service("404-1", "User not found"))?;

        user.nickname = nickname.to_string();
        user.profile_img_url = profile_img_url.to_string();

        if !self.users.update(&user) {
            return Err(AppError::service("404-1", "User not found"));
        }
        Ok(user)
    }
}
