// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tododuk API: team todo backend
//!
//! This crate provides the HTTP backend: session resolution from API keys
//! and access tokens, and team-scoped authorization for team management.

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::{Config, ConfigError};
use context::SessionCookies;
use db::{TeamRepository, UserRepository};
use middleware::PublicPaths;
use services::{TeamMemberService, TeamPermissionValidator, TeamService, TokenService, UserService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub cookies: SessionCookies,
    pub public_paths: PublicPaths,
    pub user_service: UserService,
    pub team_service: TeamService,
    pub team_member_service: TeamMemberService,
}

impl AppState {
    /// Wire services over the given storage.
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Result<Self, ConfigError> {
        let public_paths = PublicPaths::new(&config.public_paths)?;
        let cookies = SessionCookies::new(&config.cookie_domain);
        let tokens = TokenService::new(
            &config.jwt_secret_key,
            config.access_token_expiration_seconds,
        );

        let permissions = TeamPermissionValidator::new(teams.clone());
        let user_service = UserService::new(users.clone(), tokens);
        let team_service = TeamService::new(teams.clone(), permissions.clone());
        let team_member_service = TeamMemberService::new(teams, users, permissions);

        Ok(Self {
            config,
            cookies,
            public_paths,
            user_service,
            team_service,
            team_member_service,
        })
    }
}
