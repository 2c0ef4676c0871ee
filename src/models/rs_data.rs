// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Uniform JSON response envelope.

use serde::Serialize;

/// Response body shared by success and failure responses.
///
/// `data` is omitted entirely when absent, so an error serialises as
/// `{"resultCode": "...", "msg": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsData<T> {
    pub result_code: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> RsData<T> {
    pub fn new(result_code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            result_code: result_code.into(),
            msg: msg.into(),
            data: None,
        }
    }

    pub fn with_data(result_code: impl Into<String>, msg: impl Into<String>, data: T) -> Self {
        Self {
            result_code: result_code.into(),
            msg: msg.into(),
            data: Some(data),
        }
    }

    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self::with_data("200-OK", msg, data)
    }
}
