// ABOUTME: Alert panel route handlers over persisted geofence events
// ABOUTME: Lists transition and battery alerts and acknowledges them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Alert routes.

use super::AppState;
use crate::constants::limits;
use crate::database::AlertView;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthedUser;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

/// Alert listing filters
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    /// When true, only unacknowledged alerts are returned
    #[serde(default)]
    pub unread_only: Option<bool>,
}

/// Alert route table
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/:alert_id/read", post(read_handler))
}

async fn list_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<Vec<AlertView>>> {
    let limit = query
        .limit
        .unwrap_or(limits::DEFAULT_HISTORY_LIMIT)
        .min(limits::MAX_HISTORY_LIMIT);
    let alerts = state
        .database
        .list_events(
            authed.user.id,
            limit,
            None,
            query.unread_only.unwrap_or(true),
        )
        .await?;
    Ok(Json(alerts))
}

async fn read_handler(
    State(state): State<AppState>,
    _authed: AuthedUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.database.mark_event_read(alert_id).await? {
        return Err(AppError::not_found("Alert"));
    }
    Ok(Json(serde_json::json!({ "read": alert_id })))
}
