// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every failure reaches the client as an [`RsData`] body whose `resultCode`
//! has the form `<httpStatus>-<subcode>`; the HTTP status is parsed back out
//! of that prefix.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::RsData;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Structured failure carrying a machine-readable code and a message.
    #[error("{result_code}: {msg}")]
    Service { result_code: String, msg: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn service(result_code: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::Service {
            result_code: result_code.into(),
            msg: msg.into(),
        }
    }

    /// `401-1`: the endpoint needs a resolved identity.
    pub fn login_required() -> Self {
        Self::service("401-1", "Login required")
    }

    /// `403-NO_PERMISSION` with a caller-specific message.
    pub fn no_permission(msg: impl Into<String>) -> Self {
        Self::service("403-NO_PERMISSION", msg)
    }

    /// The `resultCode` reported to the client.
    pub fn result_code(&self) -> &str {
        match self {
            AppError::Service { result_code, .. } => result_code,
            AppError::BadRequest(_) => "400-1",
            AppError::Internal(_) => "500-1",
        }
    }

    /// HTTP status derived from the numeric prefix of the result code.
    pub fn status_code(&self) -> StatusCode {
        status_from_result_code(self.result_code())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Parse the status out of a `<status>-<subcode>` result code.
///
/// Falls back to 400 when the prefix is not a valid status.
pub fn status_from_result_code(result_code: &str) -> StatusCode {
    result_code
        .split('-')
        .next()
        .and_then(|prefix| prefix.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::BAD_REQUEST)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body: RsData<()> = match &self {
            AppError::Service { result_code, msg } => RsData::new(result_code.clone(), msg.clone()),
            AppError::BadRequest(msg) => RsData::new("400-1", format!("Bad request: {msg}")),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                RsData::new("500-1", "Internal server error")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
