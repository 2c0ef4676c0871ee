// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use std::sync::Arc;
use tododuk_api::config::Config;
use tododuk_api::db::{MemoryDb, UserRepository};
use tododuk_api::models::{NewUser, User};
use tododuk_api::routes::create_router;
use tododuk_api::AppState;
use tower::ServiceExt;

/// Router plus handles on its state and storage.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub db: MemoryDb,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Create a test app over an empty in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(Config::default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> TestApp {
    let db = MemoryDb::new();
    let state = Arc::new(
        AppState::new(config, Arc::new(db.clone()), Arc::new(db.clone()))
            .expect("test config should be valid"),
    );
    TestApp {
        router: create_router(state.clone()),
        state,
        db,
    }
}

/// Store a user directly, skipping password hashing.
#[allow(dead_code)]
pub fn seed_user(db: &MemoryDb, email: &str) -> User {
    db.insert(NewUser::new(email, "unused-hash".to_string(), "tester"))
        .expect("seed user")
}

#[allow(dead_code)]
pub fn bearer(api_key: &str, access_token: Option<&str>) -> String {
    match access_token {
        Some(token) => format!("Bearer {api_key} {token}"),
        None => format!("Bearer {api_key}"),
    }
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// Value part of a `Set-Cookie` header.
#[allow(dead_code)]
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}
