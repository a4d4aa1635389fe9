// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Coordinates the geofence engine with the store under per-animal serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Domain services

/// Tracking service: observations in, persisted transitions out
pub mod tracking;

pub use tracking::{BleSweepSummary, ObservationOutcome, SimulationSummary, TrackingService};
