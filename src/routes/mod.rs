// ABOUTME: Route module organization for the Corral HTTP API
// ABOUTME: Shared application state and per-domain router assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! HTTP routes, organized by domain.
//!
//! Handlers are thin: request parsing, ownership checks, and delegation to
//! the tracking service or the store. All containment decisions go through
//! the one engine inside [`crate::services::TrackingService`].

/// Alert panel endpoints
pub mod alerts;

/// Animal registry endpoints
pub mod animals;

/// Registration, login, and session endpoints
pub mod auth;

/// Zone configuration endpoints
pub mod geofence;

/// Health check endpoints
pub mod health;

/// Location reporting and history endpoints
pub mod tracking;

use crate::auth::AuthManager;
use crate::database::Database;
use crate::services::TrackingService;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The persistent store
    pub database: Arc<Database>,
    /// JWT session manager
    pub auth: Arc<AuthManager>,
    /// The tracking service wrapping the geofence engine
    pub tracking: Arc<TrackingService>,
}

/// Assemble the full API router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/animals", animals::router())
        .nest("/api/tracking", tracking::router())
        .nest("/api/geofence", geofence::router())
        .nest("/api/alerts", alerts::router())
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
