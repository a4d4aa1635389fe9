// ABOUTME: Location reporting route handlers feeding the geofence engine
// ABOUTME: Owner and device observation ingest, history, re-checks, sweeps, and simulation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Tracking routes.
//!
//! Both ingest surfaces (owner-authenticated and device-keyed) are thin
//! adapters over the one tracking service; there is a single containment
//! engine behind them.

use super::AppState;
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthedUser;
use crate::models::{Animal, TrackingPoint};
use crate::services::{BleSweepSummary, ObservationOutcome, SimulationSummary};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use corral_core::{Coordinate, EventKind, Observation};
use serde::Deserialize;
use uuid::Uuid;

/// One reported observation
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub signal_strength: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl From<ObservationRequest> for Observation {
    fn from(request: ObservationRequest) -> Self {
        Self {
            coordinate: Coordinate::new(request.latitude, request.longitude),
            battery_level: request.battery_level,
            signal_strength: request.signal_strength,
            speed: request.speed,
            notes: request.notes,
            observed_at: request.observed_at,
        }
    }
}

/// Device-keyed observation report
#[derive(Debug, Deserialize)]
pub struct DeviceReportRequest {
    pub device_id: String,
    #[serde(flatten)]
    pub observation: ObservationRequest,
}

/// Bluetooth sweep results from the mobile app
#[derive(Debug, Deserialize)]
pub struct BluetoothSweepRequest {
    #[serde(default)]
    pub detected: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

/// History pagination and filtering
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub kind: Option<EventKind>,
    #[serde(default)]
    pub unread_only: Option<bool>,
}

impl HistoryQuery {
    fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(limits::DEFAULT_HISTORY_LIMIT)
            .min(limits::MAX_HISTORY_LIMIT)
    }
}

/// Tracking route table
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/update/:animal_id", post(update_handler))
        .route("/report", post(report_handler))
        .route("/history/:animal_id", get(history_handler))
        .route("/events", get(events_handler))
        .route("/check/:animal_id", get(check_handler))
        .route("/simulate", post(simulate_handler))
        .route("/bluetooth", post(bluetooth_handler))
}

/// Owner-authenticated observation for one animal.
async fn update_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Path(animal_id): Path<Uuid>,
    Json(request): Json<ObservationRequest>,
) -> AppResult<Json<ObservationOutcome>> {
    state
        .database
        .get_animal_for_owner(animal_id, authed.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Animal"))?;

    let outcome = state
        .tracking
        .record_observation(animal_id, request.into())
        .await?;
    Ok(Json(outcome))
}

/// Device-keyed observation ingest; the collar is identified by its
/// registered device id.
async fn report_handler(
    State(state): State<AppState>,
    Json(request): Json<DeviceReportRequest>,
) -> AppResult<Json<ObservationOutcome>> {
    let outcome = state
        .tracking
        .record_device_report(&request.device_id, request.observation.into())
        .await?;
    Ok(Json(outcome))
}

async fn history_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Path(animal_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<TrackingPoint>>> {
    state
        .database
        .get_animal_for_owner(animal_id, authed.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Animal"))?;

    let points = state
        .database
        .list_tracking_points(animal_id, query.limit())
        .await?;
    Ok(Json(points))
}

async fn events_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<crate::database::AlertView>>> {
    let events = state
        .database
        .list_events(
            authed.user.id,
            query.limit(),
            query.kind,
            query.unread_only.unwrap_or(false),
        )
        .await?;
    Ok(Json(events))
}

/// Re-evaluate an animal's stored location against the current zone.
async fn check_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Path(animal_id): Path<Uuid>,
) -> AppResult<Json<Animal>> {
    state
        .database
        .get_animal_for_owner(animal_id, authed.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Animal"))?;

    let animal = state.tracking.check_animal(animal_id).await?;
    Ok(Json(animal))
}

async fn simulate_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
) -> AppResult<Json<SimulationSummary>> {
    let summary = state.tracking.simulate_movement(authed.user.id).await?;
    Ok(Json(summary))
}

async fn bluetooth_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Json(request): Json<BluetoothSweepRequest>,
) -> AppResult<Json<BleSweepSummary>> {
    let summary = state
        .tracking
        .bluetooth_sweep(authed.user.id, &request.detected, &request.missing)
        .await?;
    Ok(Json(summary))
}
