// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: registration, login, logout, profile.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::context::{Actor, ACCESS_TOKEN_COOKIE, API_KEY_COOKIE};
use crate::error::{AppError, Result};
use crate::models::{RsData, UserDto};
use crate::AppState;

use super::{validate_request, ApiJson};

/// Cookies cleared on logout, including ones left over from older sessions.
const LOGOUT_COOKIES: &[&str] = &[API_KEY_COOKIE, ACCESS_TOKEN_COOKIE, "refreshToken", "JSESSIONID"];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/user/register", post(register))
        .route("/api/v1/user/login", post(login))
        .route("/api/v1/user/logout", post(logout))
        .route("/api/v1/user/me", get(get_me).post(update_me))
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 30))]
    pub email: String,
    #[validate(length(min = 2, max = 30))]
    pub password: String,
    #[validate(length(min = 2, max = 30))]
    pub nickname: String,
}

async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<RsData<UserDto>>> {
    validate_request(&req)?;

    let user = state
        .user_service
        .join(&req.email, &req.password, &req.nickname)?;

    Ok(Json(RsData::with_data(
        "200-1",
        format!("Welcome, {}. Registration complete.", user.nickname),
        UserDto::from(&user),
    )))
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 2, max = 30))]
    pub email: String,
    #[validate(length(min = 2, max = 30))]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserDto,
    pub api_key: String,
    pub access_token: String,
}

/// Verify the password and start a cookie session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<RsData<LoginResponse>>)> {
    validate_request(&req)?;

    let user = state
        .user_service
        .find_by_email(&req.email)
        .ok_or_else(|| AppError::service("404-1", "Email is not registered"))?;
    state.user_service.check_password(&user, &req.password)?;

    let access_token = state.user_service.gen_access_token(&user)?;
    let jar = state.cookies.set(jar, API_KEY_COOKIE, Some(&user.api_key));
    let jar = state.cookies.set(jar, ACCESS_TOKEN_COOKIE, Some(&access_token));

    tracing::info!(user_id = user.id, "User logged in");

    let body = RsData::with_data(
        "200-1",
        format!("Welcome, {}.", user.nickname),
        LoginResponse {
            user: UserDto::from(&user),
            api_key: user.api_key.clone(),
            access_token,
        },
    );
    Ok((jar, Json(body)))
}

async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<RsData<()>>) {
    let jar = LOGOUT_COOKIES
        .iter()
        .fold(jar, |jar, name| state.cookies.delete(jar, name));
    (jar, Json(RsData::new("200-1", "Logged out")))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
) -> Result<Json<RsData<UserDto>>> {
    let user = state
        .user_service
        .find_by_id(actor.user_id)
        .ok_or_else(|| AppError::service("404-1", "User not found"))?;

    Ok(Json(RsData::with_data("200-1", "Profile loaded", UserDto::from(&user))))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[validate(length(min = 2, max = 30))]
    pub nickname: String,
    #[serde(default)]
    pub profile_image_url: String,
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiJson(req): ApiJson<UpdateMeRequest>,
) -> Result<Json<RsData<UserDto>>> {
    validate_request(&req)?;

    let user = state
        .user_service
        .update_profile(actor.user_id, &req.nickname, &req.profile_image_url)?;

    Ok(Json(RsData::with_data("200-1", "Profile updated", UserDto::from(&user))))
}
