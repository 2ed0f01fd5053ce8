// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
};
use ev_station_manager::config::Config;
use ev_station_manager::db::{new_document_id, Database};
use ev_station_manager::models::{Role, User};
use ev_station_manager::routes::create_router;
use ev_station_manager::services::password::hash_password;
use ev_station_manager::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test app backed by an empty in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, Database::in_memory()));
    (create_router(state.clone()), state)
}

/// Response status, headers and JSON body (`Null` when the body is not JSON).
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request through the router.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Register through the API and return the session token.
#[allow(dead_code)]
pub async fn register(app: &axum::Router, name: &str, email: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "name": name,
            "email": email,
            "password": "secret123"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["token"].as_str().unwrap().to_string()
}

/// Insert an admin account directly and return a token for it.
#[allow(dead_code)]
pub async fn create_admin(state: &AppState, email: &str) -> String {
    let user = User {
        id: new_document_id(),
        name: "Admin".to_string(),
        email: email.to_string(),
        password_hash: hash_password("admin-pass").unwrap(),
        role: Role::Admin,
        created_at: chrono::Utc::now(),
    };
    state.db.create_user(&user).await.unwrap();
    state.tokens.issue(&user.id).unwrap()
}

/// A valid create/update body.
#[allow(dead_code)]
pub fn station_body(name: &str, status: &str) -> Value {
    serde_json::json!({
        "name": name,
        "location": {
            "latitude": 40.7128,
            "longitude": -74.006,
            "address": "100 Broadway"
        },
        "status": status,
        "powerOutput": 150,
        "connectorType": "CCS1"
    })
}
