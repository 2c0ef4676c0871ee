// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication gate and its helpers).

pub mod auth;
pub mod credentials;
pub mod public_paths;

pub use auth::authenticate;
pub use public_paths::PublicPaths;
