// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;

/// Default public (unauthenticated) API paths, ANT-style.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &[
    "/api/v1/user/login",
    "/api/v1/user/logout",
    "/api/v1/user/register",
    "/oauth2/authorization/**",
];

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// HMAC secret for access tokens (raw bytes)
    pub jwt_secret_key: Vec<u8>,
    /// Access token lifetime in seconds
    pub access_token_expiration_seconds: i64,
    /// Domain attribute for session cookies. Empty means host-only.
    pub cookie_domain: String,
    /// ANT-style patterns that bypass the authentication gate
    pub public_paths: Vec<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            jwt_secret_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            access_token_expiration_seconds: 1200,
            cookie_domain: "localhost".to_string(),
            public_paths: default_public_paths(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_secret_key = env::var("JWT_SECRET_KEY")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SECRET_KEY"))?;
        if jwt_secret_key.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET_KEY"));
        }

        let access_token_expiration_seconds = match env::var("ACCESS_TOKEN_EXPIRATION_SECONDS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("ACCESS_TOKEN_EXPIRATION_SECONDS", raw))?,
            Err(_) => 1200,
        };

        let public_paths = env::var("PUBLIC_PATHS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|_| default_public_paths());

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            jwt_secret_key: jwt_secret_key.into_bytes(),
            access_token_expiration_seconds,
            cookie_domain: env::var("COOKIE_DOMAIN").unwrap_or_else(|_| "localhost".to_string()),
            public_paths,
        })
    }
}

fn default_public_paths() -> Vec<String> {
    DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),

    #[error("Invalid public path pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SECRET_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("ACCESS_TOKEN_EXPIRATION_SECONDS", "600");
        env::set_var("PUBLIC_PATHS", "/api/v1/user/login, /open/**");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_secret_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.access_token_expiration_seconds, 600);
        assert_eq!(config.public_paths, vec!["/api/v1/user/login", "/open/**"]);
        assert_eq!(config.port, 8080);

        env::remove_var("ACCESS_TOKEN_EXPIRATION_SECONDS");
        env::remove_var("PUBLIC_PATHS");
    }

    #[test]
    fn test_default_public_paths_cover_login_flow() {
        let config = Config::default();
        assert!(config
            .public_paths
            .iter()
            .any(|p| p == "/api/v1/user/register"));
        assert!(config
            .public_paths
            .iter()
            .any(|p| p.starts_with("/oauth2/authorization")));
    }
}
