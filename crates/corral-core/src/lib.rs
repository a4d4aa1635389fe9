// ABOUTME: Core types and geofence engine for the Corral livestock tracking platform
// ABOUTME: Foundation crate with domain models, errors, containment evaluation, and status transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

#![deny(unsafe_code)]

//! # Corral Core
//!
//! Foundation crate for the Corral livestock tracking platform. It holds the
//! pure domain layer: coordinate and zone models, the geometry evaluator that
//! decides containment, and the status engine that turns observations into
//! status transitions and alert events.
//!
//! Everything in this crate is a value computation: no I/O, no clocks beyond
//! the documented timestamp default, no locking. The server crate owns
//! persistence and concurrency control around it.
//!
//! ## Modules
//!
//! - **errors**: typed failures (`InvalidZone`, `InvalidObservation`)
//! - **models**: coordinates, zones, observations, subjects, and events
//! - **geofence**: haversine circle and ray-casting polygon containment
//! - **engine**: the status transition engine (`StatusEngine`)

/// Typed domain failures for zone and observation validation
pub mod errors;

/// Domain models shared between the engine and its callers
pub mod models;

/// Pure containment evaluation for circular and polygonal zones
pub mod geofence;

/// Status transition engine producing exactly-once events
pub mod engine;

pub use engine::{EngineConfig, StatusEngine, DEFAULT_LOW_BATTERY_THRESHOLD};
pub use errors::GeofenceError;
pub use geofence::{haversine_distance_km, zone_contains, EARTH_RADIUS_KM};
pub use models::{
    AnimalStatus, Coordinate, Evaluation, EventKind, GeofenceEvent, Observation, SubjectSnapshot,
    Zone,
};
