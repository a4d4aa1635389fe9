// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Provides liveness and readiness endpoints for load balancers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Health check routes.

use super::AppState;
use crate::constants::service;
use axum::routing::get;
use axum::{Json, Router};

/// Health route table
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/ready", get(ready_handler))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": service::NAME,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn ready_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ready",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
