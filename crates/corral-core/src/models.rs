// ABOUTME: Domain models for coordinates, zones, observations, and geofence events
// ABOUTME: Value types exchanged between the status engine and its collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Domain models for the geofence engine.
//!
//! These are plain values: the engine receives them by value or reference on
//! each call and holds nothing across calls. Mutation of durable state is the
//! collaborator's job, driven by the [`Evaluation`] the engine returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::GeofenceError;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, valid range [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, valid range [-180, 180]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without validating it. Use [`Coordinate::is_valid`]
    /// (or let the engine validate) before trusting the value.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and within valid WGS84 ranges.
    ///
    /// Out-of-range values are rejected by the engine, never clamped.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// The configured safe-area geometry containment is evaluated against.
///
/// Exactly one zone is active per tracked subject at evaluation time. The
/// zone is collaborator-owned configuration, passed in by value on each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Zone {
    /// Radius-from-center containment using great-circle distance
    Circle {
        /// Center of the safe area
        center: Coordinate,
        /// Radius in kilometers, must be positive
        radius_km: f64,
    },
    /// Arbitrary polygon containment using the even-odd rule
    Polygon {
        /// Ordered ring of at least three vertices; the last vertex
        /// implicitly connects back to the first
        vertices: Vec<Coordinate>,
    },
}

impl Zone {
    /// Reject geometrically degenerate zones.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidZone`] if the radius is non-positive
    /// or non-finite, the polygon has fewer than three vertices, or any
    /// coordinate is non-finite or out of range.
    pub fn validate(&self) -> Result<(), GeofenceError> {
        match self {
            Self::Circle { center, radius_km } => {
                if !center.is_valid() {
                    return Err(GeofenceError::invalid_zone(format!(
                        "circle center ({}, {}) out of range",
                        center.latitude, center.longitude
                    )));
                }
                if !radius_km.is_finite() || *radius_km <= 0.0 {
                    return Err(GeofenceError::invalid_zone(format!(
                        "radius must be positive, got {radius_km}"
                    )));
                }
                Ok(())
            }
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(GeofenceError::invalid_zone(format!(
                        "polygon needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
                for vertex in vertices {
                    if !vertex.is_valid() {
                        return Err(GeofenceError::invalid_zone(format!(
                            "polygon vertex ({}, {}) out of range",
                            vertex.latitude, vertex.longitude
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Tracking status of an animal, derived from containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalStatus {
    /// Inside the safe zone
    Active,
    /// Outside the safe zone
    Lost,
}

impl AnimalStatus {
    /// Map a containment result to the status it implies.
    #[must_use]
    pub const fn from_containment(inside: bool) -> Self {
        if inside {
            Self::Active
        } else {
            Self::Lost
        }
    }

    /// Stable string form used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Lost => "lost",
        }
    }
}

impl std::str::FromStr for AnimalStatus {
    type Err = GeofenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "lost" => Ok(Self::Lost),
            other => Err(GeofenceError::invalid_observation(format!(
                "unknown animal status: '{other}'"
            ))),
        }
    }
}

/// The previously recorded state of a tracked animal, read by the
/// collaborator and passed into the engine by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSnapshot {
    /// Identity of the tracked animal
    pub subject_id: Uuid,
    /// Display name, used in event messages
    pub name: String,
    /// Previously recorded containment; `None` until the first observation
    pub containment: Option<bool>,
    /// Previously recorded status
    pub status: AnimalStatus,
}

/// A single reported location plus optional telemetry for a tracked animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Reported position; required and validated, never clamped
    pub coordinate: Coordinate,
    /// Collar battery percentage in [0, 100]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    /// Radio signal strength as reported by the collar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<f64>,
    /// Ground speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Free-form notes attached by the reporter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Device timestamp; evaluation time is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl Observation {
    /// Observation with just a coordinate and no telemetry.
    #[must_use]
    pub const fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            battery_level: None,
            signal_strength: None,
            speed: None,
            notes: None,
            observed_at: None,
        }
    }
}

/// What kind of event a transition produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The animal returned to the safe zone
    Entered,
    /// The animal left the safe zone
    Exited,
    /// Collar battery dropped below the configured threshold
    LowBattery,
}

impl EventKind {
    /// Stable string form used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entered => "entered",
            Self::Exited => "exited",
            Self::LowBattery => "low_battery",
        }
    }
}

impl std::str::FromStr for EventKind {
    type Err = GeofenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entered" => Ok(Self::Entered),
            "exited" => Ok(Self::Exited),
            "low_battery" => Ok(Self::LowBattery),
            other => Err(GeofenceError::invalid_observation(format!(
                "unknown event kind: '{other}'"
            ))),
        }
    }
}

/// An alert/history record emitted on a transition or telemetry threshold.
///
/// Append-only: emitted at most once per transition, owned by the
/// collaborator's store once persisted, never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceEvent {
    /// The animal the event is about
    pub subject_id: Uuid,
    /// What happened
    pub kind: EventKind,
    /// Human-readable description for the alert panel
    pub message: String,
    /// Latitude where the event was observed
    pub latitude: f64,
    /// Longitude where the event was observed
    pub longitude: f64,
    /// When the event was observed
    pub timestamp: DateTime<Utc>,
}

/// The engine's verdict for one observation.
///
/// The returned event list is exactly and only what must be durably
/// appended; `containment` and `status` are exactly what must overwrite the
/// subject's stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the observation lies inside the active zone
    pub containment: bool,
    /// Status implied by the new containment
    pub status: AnimalStatus,
    /// Ordered events: containment transition first, then battery
    pub events: Vec<GeofenceEvent>,
}
