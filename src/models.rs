// ABOUTME: Server-side data models for users, animals, telemetry, and event records
// ABOUTME: Persistent record shapes mapped to and from the SQLite store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Server-side records.
//!
//! These mirror the durable store. The pure domain values live in
//! [`corral_core`]; an [`Animal`] converts into a
//! [`corral_core::SubjectSnapshot`] at the engine boundary.

use chrono::{DateTime, Utc};
use corral_core::{AnimalStatus, EventKind, SubjectSnapshot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account that owns animals and a zone configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique id
    pub id: Uuid,
    /// Login email, unique
    pub email: String,
    /// bcrypt password hash; never serialized into responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Coarse role label (the source only ever used "admin")
    pub role: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New account with a fresh id and creation timestamp.
    #[must_use]
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role: "admin".into(),
            created_at: Utc::now(),
        }
    }
}

/// A tracked animal and its last recorded state.
///
/// Location and containment are `None` until the first observation; the
/// engine establishes the baseline silently on first sighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    /// Unique id
    pub id: Uuid,
    /// Owning account
    pub owner_id: Uuid,
    /// Display name
    pub name: String,
    /// Collar device identifier, unique across the herd
    pub device_id: String,
    /// Physical ear tag label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear_tag: Option<String>,
    /// Species label
    pub species: String,
    /// Last reported latitude
    pub latitude: Option<f64>,
    /// Last reported longitude
    pub longitude: Option<f64>,
    /// Last computed containment; `None` before the first observation
    pub containment: Option<bool>,
    /// Current tracking status
    pub status: AnimalStatus,
    /// Last reported battery percentage
    pub battery_level: Option<f64>,
    /// Last reported signal strength
    pub signal_strength: Option<f64>,
    /// When the collar last reported
    pub last_seen: Option<DateTime<Utc>>,
    /// When the animal was registered
    pub created_at: DateTime<Utc>,
}

impl Animal {
    /// New unlocated animal owned by `owner_id`.
    #[must_use]
    pub fn new(
        owner_id: Uuid,
        name: String,
        device_id: String,
        ear_tag: Option<String>,
        species: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            device_id,
            ear_tag,
            species,
            latitude: None,
            longitude: None,
            containment: None,
            status: AnimalStatus::Active,
            battery_level: None,
            signal_strength: None,
            last_seen: None,
            created_at: Utc::now(),
        }
    }

    /// The engine-facing view of this animal's previous state.
    #[must_use]
    pub fn snapshot(&self) -> SubjectSnapshot {
        SubjectSnapshot {
            subject_id: self.id,
            name: self.name.clone(),
            containment: self.containment,
            status: self.status,
        }
    }
}

/// One appended row of raw collar telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingPoint {
    /// Unique id
    pub id: Uuid,
    /// The animal this point belongs to
    pub animal_id: Uuid,
    /// Reported latitude
    pub latitude: f64,
    /// Reported longitude
    pub longitude: f64,
    /// Ground speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Battery percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    /// Signal strength
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<f64>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the point was recorded
    pub recorded_at: DateTime<Utc>,
}

/// A persisted transition or telemetry event, shown in the alert panel.
///
/// Append-only apart from the read flag. Bluetooth sweeps can produce events
/// without a location, so the coordinate is optional here even though
/// GPS-derived events always carry one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique id
    pub id: Uuid,
    /// The animal the event is about
    pub animal_id: Uuid,
    /// What happened
    pub kind: EventKind,
    /// Human-readable description
    pub message: String,
    /// Latitude where the event was observed, when known
    pub latitude: Option<f64>,
    /// Longitude where the event was observed, when known
    pub longitude: Option<f64>,
    /// Whether the alert has been acknowledged
    pub is_read: bool,
    /// When the event was observed
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Persistable record from an engine-produced event.
    #[must_use]
    pub fn from_event(event: &corral_core::GeofenceEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            animal_id: event.subject_id,
            kind: event.kind,
            message: event.message.clone(),
            latitude: Some(event.latitude),
            longitude: Some(event.longitude),
            is_read: false,
            created_at: event.timestamp,
        }
    }
}
