// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Station lifecycle over HTTP.

use axum::http::{Method, StatusCode};
use ev_station_manager::config::Config;
use serde_json::json;

mod common;
use common::{create_admin, create_test_app, create_test_app_with, register, send, station_body};

#[tokio::test]
async fn test_station_lifecycle() {
    let (app, state) = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;
    let user_id = state.tokens.verify(&token).unwrap().user_id;

    let created = send(
        &app,
        Method::POST,
        "/api/stations",
        Some(&token),
        Some(station_body("Downtown Hub", "maintenance")),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["_id"].as_str().unwrap().to_string();
    assert_eq!(created.body["createdBy"], user_id.as_str());
    assert_eq!(created.body["status"], "maintenance");
    assert_eq!(created.body["location"]["address"], "100 Broadway");

    let fetched = send(&app, Method::GET, &format!("/api/stations/{}", id), None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);

    // Full replace: address and status are omitted.
    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/stations/{}", id),
        Some(&token),
        Some(json!({
            "name": "Downtown Hub II",
            "location": { "latitude": 40.0, "longitude": -73.0 },
            "powerOutput": 350,
            "connectorType": "CCS2"
        })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["_id"], id.as_str());
    assert_eq!(updated.body["name"], "Downtown Hub II");
    assert_eq!(updated.body["status"], "active");
    assert!(updated.body["location"].get("address").is_none());
    assert_eq!(updated.body["createdAt"], created.body["createdAt"]);
    assert_eq!(updated.body["createdBy"], created.body["createdBy"]);

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/stations/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        deleted.body,
        json!({ "message": "Station deleted successfully" })
    );

    let gone = send(&app, Method::GET, &format!("/api/stations/{}", id), None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "Station not found");
}

#[tokio::test]
async fn test_missing_station_operations_return_404() {
    let (app, _) = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    let update = send(
        &app,
        Method::PUT,
        "/api/stations/missing",
        Some(&token),
        Some(station_body("Hub", "active")),
    )
    .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let delete = send(&app, Method::DELETE, "/api/stations/missing", Some(&token), None).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_writes_require_token_but_reads_do_not() {
    let (app, _) = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;
    let created = send(
        &app,
        Method::POST,
        "/api/stations",
        Some(&token),
        Some(station_body("Hub", "active")),
    )
    .await;
    let uri = format!("/api/stations/{}", created.body["_id"].as_str().unwrap());

    let read = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(read.status, StatusCode::OK);

    let update = send(&app, Method::PUT, &uri, None, Some(station_body("X", "active"))).await;
    assert_eq!(update.status, StatusCode::UNAUTHORIZED);

    let delete = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(delete.status, StatusCode::UNAUTHORIZED);

    // Still there.
    let read = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(read.status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (app, _) = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    for name in ["first", "second", "third"] {
        let response = send(
            &app,
            Method::POST,
            "/api/stations",
            Some(&token),
            Some(station_body(name, "active")),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let list = send(&app, Method::GET, "/api/stations", None, None).await;
    let names: Vec<&str> = list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_any_user_may_delete_by_default() {
    let (app, _) = create_test_app();
    let owner = register(&app, "Ada", "ada@example.com").await;
    let other = register(&app, "Bob", "bob@example.com").await;

    let created = send(
        &app,
        Method::POST,
        "/api/stations",
        Some(&owner),
        Some(station_body("Hub", "active")),
    )
    .await;
    let uri = format!("/api/stations/{}", created.body["_id"].as_str().unwrap());

    let delete = send(&app, Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(delete.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_only_delete() {
    let config = Config {
        admin_only_delete: true,
        ..Config::default()
    };
    let (app, state) = create_test_app_with(config);
    let user = register(&app, "Ada", "ada@example.com").await;
    let admin = create_admin(&state, "admin@example.com").await;

    let created = send(
        &app,
        Method::POST,
        "/api/stations",
        Some(&user),
        Some(station_body("Hub", "active")),
    )
    .await;
    let uri = format!("/api/stations/{}", created.body["_id"].as_str().unwrap());

    let anonymous = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forbidden = send(&app, Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(
        forbidden.body["message"],
        "Access denied. Admin privileges required."
    );

    // Updates are not admin-gated.
    let update = send(
        &app,
        Method::PUT,
        &uri,
        Some(&user),
        Some(station_body("Hub 2", "active")),
    )
    .await;
    assert_eq!(update.status, StatusCode::OK);

    let allowed = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(allowed.status, StatusCode::OK);
}
