// ABOUTME: Zone configuration route handlers for the safe-area geometry
// ABOUTME: Fetch and replace the owner's zone, re-checking the herd on change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Geofence routes.

use super::AppState;
use crate::errors::AppResult;
use crate::middleware::AuthedUser;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use corral_core::Zone;
use serde::Serialize;

/// Zone replacement response
#[derive(Debug, Serialize)]
pub struct ZoneUpdateResponse {
    /// The zone now in effect
    pub zone: Zone,
    /// Animals whose containment changed under the new geometry
    pub animals_updated: usize,
}

/// Geofence route table
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_handler).put(put_handler))
}

/// The zone in effect: the owner's stored zone, or the configured default.
async fn get_handler(State(state): State<AppState>, authed: AuthedUser) -> AppResult<Json<Zone>> {
    let zone = state.tracking.zone_for_owner(authed.user.id).await?;
    Ok(Json(zone))
}

/// Replace the zone. The geometry is validated before it is stored, and
/// every located animal is re-checked against it so transitions fire
/// exactly once.
async fn put_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Json(zone): Json<Zone>,
) -> AppResult<Json<ZoneUpdateResponse>> {
    let animals_updated = state.tracking.replace_zone(authed.user.id, &zone).await?;
    Ok(Json(ZoneUpdateResponse {
        zone,
        animals_updated,
    }))
}
