// ABOUTME: HTTP-level integration tests exercising the axum router end to end
// ABOUTME: Covers auth flows, observation ingest, alerts, and zone replacement over JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::create_test_state;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "farmer@example.com",
            "password": "correct horse battery staple",
            "name": "Test Farmer"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["access_token"].is_string());

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({
            "email": "farmer@example.com",
            "password": "correct horse battery staple"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_owned()
}

async fn register_animal(app: &Router, token: &str, name: &str, device_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/animals",
        Some(token),
        Some(json!({ "name": name, "device_id": device_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = corral::routes::router(create_test_state().await);
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn auth_flow_and_me_endpoint() {
    let app = corral::routes::router(create_test_state().await);
    let token = register_and_login(&app).await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "farmer@example.com");

    // Missing and malformed credentials are rejected
    let (status, _) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Bad password is rejected without leaking which part was wrong
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "farmer@example.com", "password": "nope nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_INVALID");
}

#[tokio::test]
async fn weak_registration_input_is_rejected() {
    let app = corral::routes::router(create_test_state().await);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "long enough pw", "name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "a@b.co", "password": "short", "name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn device_reports_drive_alerts_over_http() {
    let app = corral::routes::router(create_test_state().await);
    let token = register_and_login(&app).await;
    register_animal(&app, &token, "Bessie", "collar-001").await;

    // First report inside the default paddock: baseline, no alert
    let (status, body) = send(
        &app,
        "POST",
        "/api/tracking/report",
        None,
        Some(json!({
            "device_id": "collar-001",
            "latitude": -1.2921,
            "longitude": 36.8219,
            "battery_level": 90.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluation"]["containment"], true);
    assert_eq!(body["evaluation"]["events"].as_array().unwrap().len(), 0);

    // Walks out with a low battery: exited then low_battery
    let (status, body) = send(
        &app,
        "POST",
        "/api/tracking/report",
        None,
        Some(json!({
            "device_id": "collar-001",
            "latitude": -1.35,
            "longitude": 36.9,
            "battery_level": 12.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluation"]["status"], "lost");
    let events = body["evaluation"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["kind"], "exited");
    assert_eq!(events[1]["kind"], "low_battery");

    // Both alerts are pending, acknowledge the first
    let (status, body) = send(&app, "GET", "/api/alerts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let alerts = body.as_array().unwrap();
    assert_eq!(alerts.len(), 2);

    let alert_id = alerts[0]["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/alerts/{alert_id}/read"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "GET",
        "/api/alerts?unread_only=true",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Unknown collar gets a 404, malformed coordinates a typed 400
    let (status, _) = send(
        &app,
        "POST",
        "/api/tracking/report",
        None,
        Some(json!({ "device_id": "collar-ghost", "latitude": 0.0, "longitude": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/tracking/report",
        None,
        Some(json!({ "device_id": "collar-001", "latitude": 123.0, "longitude": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_OBSERVATION");
}

#[tokio::test]
async fn zone_replacement_over_http() {
    let app = corral::routes::router(create_test_state().await);
    let token = register_and_login(&app).await;
    let animal_id = register_animal(&app, &token, "Bessie", "collar-001").await;

    // The configured default zone is served before any is stored
    let (status, body) = send(&app, "GET", "/api/geofence", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "circle");

    // Put the animal inside the default paddock first
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/tracking/update/{animal_id}"),
        Some(&token),
        Some(json!({ "latitude": -1.2921, "longitude": 36.8219 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Replace with a polygon that excludes the herd
    let (status, body) = send(
        &app,
        "PUT",
        "/api/geofence",
        Some(&token),
        Some(json!({
            "type": "polygon",
            "vertices": [
                { "latitude": 40.7128, "longitude": -74.0060 },
                { "latitude": 40.7138, "longitude": -74.0060 },
                { "latitude": 40.7138, "longitude": -74.0050 },
                { "latitude": 40.7128, "longitude": -74.0050 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["animals_updated"], 1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/tracking/check/{animal_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "lost");

    // Degenerate geometry is refused with the typed code
    let (status, body) = send(
        &app,
        "PUT",
        "/api/geofence",
        Some(&token),
        Some(json!({
            "type": "polygon",
            "vertices": [
                { "latitude": 0.0, "longitude": 0.0 },
                { "latitude": 1.0, "longitude": 1.0 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ZONE");
}

#[tokio::test]
async fn animal_crud_is_owner_scoped() {
    let app = corral::routes::router(create_test_state().await);
    let token = register_and_login(&app).await;
    let animal_id = register_animal(&app, &token, "Bessie", "collar-001").await;

    // Duplicate collar registration conflicts
    let (status, body) = send(
        &app,
        "POST",
        "/api/animals",
        Some(&token),
        Some(json!({ "name": "Clone", "device_id": "collar-001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "RESOURCE_ALREADY_EXISTS");

    let (status, body) = send(&app, "GET", "/api/animals", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/animals/{animal_id}"),
        Some(&token),
        Some(json!({ "ear_tag": "KE-042" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ear_tag"], "KE-042");
    assert_eq!(body["name"], "Bessie");

    // A second account cannot see the first account's animal
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "rustler@example.com",
            "password": "longer than eight",
            "name": "Rustler"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_token = body["access_token"].as_str().unwrap().to_owned();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/animals/{animal_id}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/animals/{animal_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/animals", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
