// ABOUTME: Tracking service applying the geofence engine to persisted animal state
// ABOUTME: Serializes per-animal updates so transition events fire exactly once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! The tracking service.
//!
//! The engine itself is pure; this service owns the read-modify-write cycle
//! around it. Observations for the same animal are serialized behind a
//! per-animal async mutex so the "previous containment" fed into the engine
//! is never stale: without it, two concurrent exits could both fire
//! transition events, or an exit could be lost. Different animals proceed in
//! parallel with no coordination.

use crate::config::TrackingConfig;
use crate::constants::limits;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Animal, EventRecord, TrackingPoint};
use chrono::Utc;
use corral_core::{
    AnimalStatus, Coordinate, EngineConfig, Evaluation, EventKind, GeofenceEvent, Observation,
    StatusEngine, Zone,
};
use dashmap::DashMap;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Result of applying one observation: the refreshed animal record plus the
/// engine's verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationOutcome {
    /// The animal with its new state applied
    pub animal: Animal,
    /// What the engine decided
    pub evaluation: Evaluation,
}

/// Result of a Bluetooth presence sweep.
#[derive(Debug, Clone, Serialize)]
pub struct BleSweepSummary {
    /// Device ids whose state was updated
    pub updated: Vec<String>,
    /// Number of transition events appended
    pub events: usize,
}

/// Result of a simulated movement round.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    /// Number of animals moved
    pub moved: usize,
    /// Number of animals that left the zone this round
    pub exited: usize,
}

/// Coordinates the status engine with the store.
#[derive(Clone)]
pub struct TrackingService {
    database: Arc<Database>,
    engine: StatusEngine,
    default_zone: Zone,
    subject_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl TrackingService {
    /// Build the service from the tracking configuration.
    #[must_use]
    pub fn new(database: Arc<Database>, config: &TrackingConfig) -> Self {
        Self {
            database,
            engine: StatusEngine::new(EngineConfig {
                low_battery_threshold: config.low_battery_threshold,
            }),
            default_zone: config.default_zone.clone(),
            subject_locks: Arc::new(DashMap::new()),
        }
    }

    /// The zone in effect for an owner: their stored zone, or the configured
    /// default when none was set.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone lookup fails.
    pub async fn zone_for_owner(&self, owner_id: Uuid) -> AppResult<Zone> {
        Ok(self
            .database
            .get_zone(owner_id)
            .await?
            .unwrap_or_else(|| self.default_zone.clone()))
    }

    /// Apply one observation to one animal.
    ///
    /// Appends a telemetry point, overwrites the tracked state with the
    /// engine's verdict, and appends exactly the events the engine returned.
    /// On `InvalidObservation` the stored state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown animal, the engine's typed
    /// failure for bad input, or a database error.
    pub async fn record_observation(
        &self,
        animal_id: Uuid,
        mut observation: Observation,
    ) -> AppResult<ObservationOutcome> {
        let lock = self.lock_for(animal_id);
        let _guard = lock.lock().await;

        // Re-read inside the lock so the snapshot is never stale.
        let animal = self
            .database
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Animal"))?;

        let zone = self.zone_for_owner(animal.owner_id).await?;

        // Pin the timestamp before evaluation so the engine, the telemetry
        // point, and last_seen all agree.
        let recorded_at = observation.observed_at.unwrap_or_else(Utc::now);
        observation.observed_at = Some(recorded_at);

        let evaluation = self
            .engine
            .apply_observation(&animal.snapshot(), &zone, &observation)?;

        self.database
            .insert_tracking_point(&TrackingPoint {
                id: Uuid::new_v4(),
                animal_id,
                latitude: observation.coordinate.latitude,
                longitude: observation.coordinate.longitude,
                speed: observation.speed,
                battery_level: observation.battery_level,
                signal_strength: observation.signal_strength,
                notes: observation.notes.clone(),
                recorded_at,
            })
            .await?;

        self.database
            .apply_tracked_state(
                animal_id,
                observation.coordinate.latitude,
                observation.coordinate.longitude,
                evaluation.containment,
                evaluation.status,
                observation.battery_level,
                observation.signal_strength,
                recorded_at,
            )
            .await?;

        self.append_events(&evaluation.events).await?;

        let animal = self
            .database
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Animal"))?;

        tracing::debug!(
            animal = %animal.name,
            containment = evaluation.containment,
            events = evaluation.events.len(),
            "observation applied"
        );

        Ok(ObservationOutcome { animal, evaluation })
    }

    /// Apply an observation reported by collar device id.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the device is not registered, plus
    /// everything [`Self::record_observation`] can return.
    pub async fn record_device_report(
        &self,
        device_id: &str,
        observation: Observation,
    ) -> AppResult<ObservationOutcome> {
        let animal = self
            .database
            .get_animal_by_device(device_id)
            .await?
            .ok_or_else(|| AppError::not_found("Device"))?;
        self.record_observation(animal.id, observation).await
    }

    /// Re-evaluate an animal's stored location against the current zone.
    ///
    /// A transition detected here (after a zone change, for example) is
    /// persisted exactly once. Animals without a recorded location are
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown animal, or a database or
    /// engine failure.
    pub async fn check_animal(&self, animal_id: Uuid) -> AppResult<Animal> {
        let lock = self.lock_for(animal_id);
        let _guard = lock.lock().await;

        let animal = self
            .database
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Animal"))?;

        let (Some(latitude), Some(longitude)) = (animal.latitude, animal.longitude) else {
            return Ok(animal);
        };

        let zone = self.zone_for_owner(animal.owner_id).await?;
        let mut observation = Observation::at(Coordinate::new(latitude, longitude));
        observation.observed_at = Some(Utc::now());

        let evaluation = self
            .engine
            .apply_observation(&animal.snapshot(), &zone, &observation)?;

        if animal.containment != Some(evaluation.containment) {
            self.database
                .apply_presence_state(animal_id, evaluation.containment, evaluation.status, None)
                .await?;
            self.append_events(&evaluation.events).await?;
        }

        self.database
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Animal"))
    }

    /// Replace the owner's zone and re-check every located animal against
    /// the new geometry, appending any transitions.
    ///
    /// Returns the number of animals whose containment changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidZone` for degenerate geometry, or a database failure.
    pub async fn replace_zone(&self, owner_id: Uuid, zone: &Zone) -> AppResult<usize> {
        zone.validate().map_err(AppError::from)?;
        self.database.set_zone(owner_id, zone).await?;

        let mut updated = 0;
        for animal in self.database.list_located_animals(owner_id).await? {
            let before = animal.containment;
            let rechecked = self.check_animal(animal.id).await?;
            if rechecked.containment != before {
                updated += 1;
            }
        }

        tracing::info!(%owner_id, updated, "zone replaced and herd re-checked");
        Ok(updated)
    }

    /// Apply a Bluetooth presence sweep: detected collars are inside,
    /// missing collars are outside.
    ///
    /// Sweeps carry no coordinate, so transitions are synthesized against
    /// the last known location under the same exactly-once rules the engine
    /// applies: an event fires only when containment actually flips, and an
    /// unknown prior establishes the baseline silently.
    ///
    /// # Errors
    ///
    /// Returns a database failure; unknown device ids are skipped.
    pub async fn bluetooth_sweep(
        &self,
        owner_id: Uuid,
        detected: &[String],
        missing: &[String],
    ) -> AppResult<BleSweepSummary> {
        let mut summary = BleSweepSummary {
            updated: Vec::new(),
            events: 0,
        };

        for device_id in detected {
            if let Some(count) = self.apply_presence(owner_id, device_id, true).await? {
                summary.updated.push(device_id.clone());
                summary.events += count;
            }
        }
        for device_id in missing {
            if let Some(count) = self.apply_presence(owner_id, device_id, false).await? {
                summary.updated.push(device_id.clone());
                summary.events += count;
            }
        }

        Ok(summary)
    }

    /// Random-walk every located animal of an owner, for demos and tests.
    ///
    /// Each step goes through the same observation path as a real collar
    /// report, so transitions and alerts behave identically.
    ///
    /// # Errors
    ///
    /// Returns a database or engine failure.
    pub async fn simulate_movement(&self, owner_id: Uuid) -> AppResult<SimulationSummary> {
        let animals = self.database.list_located_animals(owner_id).await?;
        let mut summary = SimulationSummary {
            moved: 0,
            exited: 0,
        };

        for animal in animals {
            let (Some(latitude), Some(longitude)) = (animal.latitude, animal.longitude) else {
                continue;
            };

            let observation = {
                let mut rng = rand::thread_rng();
                let step = limits::SIMULATION_STEP_DEGREES;
                let latitude = (latitude + rng.gen_range(-step..=step)).clamp(-90.0, 90.0);
                let longitude = (longitude + rng.gen_range(-step..=step)).clamp(-180.0, 180.0);
                let mut observation = Observation::at(Coordinate::new(latitude, longitude));
                observation.speed = Some(rng.gen_range(0.0..=5.0));
                observation.signal_strength = Some(rng.gen_range(50.0..=100.0));
                observation
            };

            let outcome = self.record_observation(animal.id, observation).await?;
            summary.moved += 1;
            if outcome
                .evaluation
                .events
                .iter()
                .any(|e| e.kind == EventKind::Exited)
            {
                summary.exited += 1;
            }
        }

        Ok(summary)
    }

    /// Set one animal's presence by device id; returns `None` when the
    /// device is unknown or owned by someone else, otherwise the number of
    /// events appended.
    async fn apply_presence(
        &self,
        owner_id: Uuid,
        device_id: &str,
        inside: bool,
    ) -> AppResult<Option<usize>> {
        let Some(animal) = self.database.get_animal_by_device(device_id).await? else {
            return Ok(None);
        };
        if animal.owner_id != owner_id {
            return Ok(None);
        }

        let lock = self.lock_for(animal.id);
        let _guard = lock.lock().await;

        let animal = self
            .database
            .get_animal(animal.id)
            .await?
            .ok_or_else(|| AppError::not_found("Animal"))?;

        let now = Utc::now();
        let mut events = 0;

        match animal.containment {
            Some(previous) if previous != inside => {
                let kind = if inside {
                    EventKind::Entered
                } else {
                    EventKind::Exited
                };
                let message = if inside {
                    format!("Animal \"{}\" is back in Bluetooth range", animal.name)
                } else {
                    format!("Animal \"{}\" is out of Bluetooth range", animal.name)
                };
                self.database
                    .insert_event(&EventRecord {
                        id: Uuid::new_v4(),
                        animal_id: animal.id,
                        kind,
                        message,
                        latitude: animal.latitude,
                        longitude: animal.longitude,
                        is_read: false,
                        created_at: now,
                    })
                    .await?;
                events = 1;
            }
            // Unchanged containment or unknown prior: update state silently.
            _ => {}
        }

        self.database
            .apply_presence_state(
                animal.id,
                inside,
                AnimalStatus::from_containment(inside),
                Some(now),
            )
            .await?;

        Ok(Some(events))
    }

    async fn append_events(&self, events: &[GeofenceEvent]) -> AppResult<()> {
        for event in events {
            self.database
                .insert_event(&EventRecord::from_event(event))
                .await?;
        }
        Ok(())
    }

    fn lock_for(&self, animal_id: Uuid) -> Arc<Mutex<()>> {
        self.subject_locks
            .entry(animal_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
