// ABOUTME: Status transition engine turning observations into state updates and events
// ABOUTME: Emits entered/exited events exactly once per containment flip plus battery alerts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! The status engine.
//!
//! One call per observation: validate, evaluate containment, detect the
//! transition against the subject's previous state, and return the new state
//! plus the ordered list of events the collaborator must append. The engine
//! persists nothing and holds no state between calls; serializing concurrent
//! observations for the same subject is the collaborator's responsibility.

use chrono::Utc;

use crate::errors::GeofenceError;
use crate::geofence::zone_contains;
use crate::models::{
    AnimalStatus, Evaluation, EventKind, GeofenceEvent, Observation, SubjectSnapshot, Zone,
};

/// Battery percentage below which a `low_battery` event is emitted.
pub const DEFAULT_LOW_BATTERY_THRESHOLD: f64 = 20.0;

/// Tunables for the status engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Battery percentage below which a `low_battery` event fires
    pub low_battery_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            low_battery_threshold: DEFAULT_LOW_BATTERY_THRESHOLD,
        }
    }
}

/// Stateless evaluator of observations against a subject's previous state.
#[derive(Debug, Clone, Default)]
pub struct StatusEngine {
    config: EngineConfig,
}

impl StatusEngine {
    /// Engine with explicit configuration.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one observation for one subject.
    ///
    /// Transition rules:
    /// - previous containment unknown: baseline is established silently, the
    ///   status is set to match containment, no event
    /// - inside → outside: one `exited` event, status `lost`
    /// - outside → inside: one `entered` event, status `active`
    /// - unchanged: no containment event
    ///
    /// A `low_battery` event is appended independently of containment when
    /// battery telemetry is present and below the configured threshold, so a
    /// single call can yield `[exited, low_battery]`.
    ///
    /// Deterministic for identical inputs: the only implicit clock read is
    /// the event timestamp when `observed_at` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidObservation`] for an out-of-range
    /// coordinate or battery telemetry outside [0, 100], and
    /// [`GeofenceError::InvalidZone`] for a degenerate zone. On error no
    /// state change and no events are produced; the subject's stored state
    /// must be left untouched.
    pub fn apply_observation(
        &self,
        subject: &SubjectSnapshot,
        zone: &Zone,
        observation: &Observation,
    ) -> Result<Evaluation, GeofenceError> {
        if !observation.coordinate.is_valid() {
            return Err(GeofenceError::invalid_observation(format!(
                "coordinate ({}, {}) out of range",
                observation.coordinate.latitude, observation.coordinate.longitude
            )));
        }
        if let Some(battery) = observation.battery_level {
            if !battery.is_finite() || !(0.0..=100.0).contains(&battery) {
                return Err(GeofenceError::invalid_observation(format!(
                    "battery level must be within [0, 100], got {battery}"
                )));
            }
        }

        let containment = zone_contains(zone, observation.coordinate)?;
        let status = AnimalStatus::from_containment(containment);
        let timestamp = observation.observed_at.unwrap_or_else(Utc::now);

        let mut events = Vec::new();
        match subject.containment {
            Some(true) if !containment => {
                events.push(GeofenceEvent {
                    subject_id: subject.subject_id,
                    kind: EventKind::Exited,
                    message: format!("Animal \"{}\" has exited the safe zone", subject.name),
                    latitude: observation.coordinate.latitude,
                    longitude: observation.coordinate.longitude,
                    timestamp,
                });
            }
            Some(false) if containment => {
                events.push(GeofenceEvent {
                    subject_id: subject.subject_id,
                    kind: EventKind::Entered,
                    message: format!("Animal \"{}\" has returned to the safe zone", subject.name),
                    latitude: observation.coordinate.latitude,
                    longitude: observation.coordinate.longitude,
                    timestamp,
                });
            }
            // First sighting establishes the baseline silently; an unchanged
            // containment emits nothing.
            _ => {}
        }

        if let Some(battery) = observation.battery_level {
            if battery < self.config.low_battery_threshold {
                events.push(GeofenceEvent {
                    subject_id: subject.subject_id,
                    kind: EventKind::LowBattery,
                    message: format!(
                        "Low battery: \"{}\" reported {battery:.0}%",
                        subject.name
                    ),
                    latitude: observation.coordinate.latitude,
                    longitude: observation.coordinate.longitude,
                    timestamp,
                });
            }
        }

        Ok(Evaluation {
            containment,
            status,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn paddock() -> Zone {
        Zone::Circle {
            center: Coordinate::new(-1.2921, 36.8219),
            radius_km: 0.5,
        }
    }

    fn inside_point() -> Coordinate {
        Coordinate::new(-1.2921, 36.8219)
    }

    fn outside_point() -> Coordinate {
        Coordinate::new(-1.35, 36.9)
    }

    fn subject(containment: Option<bool>) -> SubjectSnapshot {
        SubjectSnapshot {
            subject_id: Uuid::new_v4(),
            name: "Bessie".into(),
            containment,
            status: match containment {
                Some(false) => AnimalStatus::Lost,
                _ => AnimalStatus::Active,
            },
        }
    }

    fn engine() -> StatusEngine {
        StatusEngine::default()
    }

    #[test]
    fn first_observation_is_silent_regardless_of_containment() {
        for point in [inside_point(), outside_point()] {
            let result = engine()
                .apply_observation(&subject(None), &paddock(), &Observation::at(point))
                .unwrap();
            assert!(result.events.is_empty());
            assert_eq!(
                result.status,
                AnimalStatus::from_containment(result.containment)
            );
        }
    }

    #[test]
    fn exit_emits_exactly_one_event_then_goes_quiet() {
        let eng = engine();
        let result = eng
            .apply_observation(
                &subject(Some(true)),
                &paddock(),
                &Observation::at(outside_point()),
            )
            .unwrap();
        assert_eq!(result.status, AnimalStatus::Lost);
        assert!(!result.containment);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].kind, EventKind::Exited);
        assert!(result.events[0].message.contains("Bessie"));

        // Still outside: no further containment event
        let again = eng
            .apply_observation(
                &subject(Some(false)),
                &paddock(),
                &Observation::at(outside_point()),
            )
            .unwrap();
        assert!(again.events.is_empty());
        assert_eq!(again.status, AnimalStatus::Lost);
    }

    #[test]
    fn reentry_emits_entered_and_restores_active() {
        let result = engine()
            .apply_observation(
                &subject(Some(false)),
                &paddock(),
                &Observation::at(inside_point()),
            )
            .unwrap();
        assert_eq!(result.status, AnimalStatus::Active);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].kind, EventKind::Entered);
    }

    #[test]
    fn low_battery_fires_without_containment_change() {
        let mut observation = Observation::at(inside_point());
        observation.battery_level = Some(15.0);

        let result = engine()
            .apply_observation(&subject(Some(true)), &paddock(), &observation)
            .unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].kind, EventKind::LowBattery);
        assert_eq!(result.status, AnimalStatus::Active);
    }

    #[test]
    fn exit_and_low_battery_are_ordered() {
        let mut observation = Observation::at(outside_point());
        observation.battery_level = Some(15.0);

        let result = engine()
            .apply_observation(&subject(Some(true)), &paddock(), &observation)
            .unwrap();
        let kinds: Vec<EventKind> = result.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Exited, EventKind::LowBattery]);
    }

    #[test]
    fn battery_at_threshold_does_not_fire() {
        let mut observation = Observation::at(inside_point());
        observation.battery_level = Some(DEFAULT_LOW_BATTERY_THRESHOLD);

        let result = engine()
            .apply_observation(&subject(Some(true)), &paddock(), &observation)
            .unwrap();
        assert!(result.events.is_empty());
    }

    #[test]
    fn threshold_is_configurable() {
        let eng = StatusEngine::new(EngineConfig {
            low_battery_threshold: 50.0,
        });
        let mut observation = Observation::at(inside_point());
        observation.battery_level = Some(35.0);

        let result = eng
            .apply_observation(&subject(Some(true)), &paddock(), &observation)
            .unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].kind, EventKind::LowBattery);
    }

    #[test]
    fn identical_inputs_produce_identical_output() {
        let snapshot = subject(Some(true));
        let mut observation = Observation::at(outside_point());
        observation.battery_level = Some(12.0);
        observation.observed_at = Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap());

        let eng = engine();
        let first = eng
            .apply_observation(&snapshot, &paddock(), &observation)
            .unwrap();
        let second = eng
            .apply_observation(&snapshot, &paddock(), &observation)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_coordinate_is_rejected_before_evaluation() {
        let err = engine()
            .apply_observation(
                &subject(Some(true)),
                &paddock(),
                &Observation::at(Coordinate::new(120.0, 0.0)),
            )
            .unwrap_err();
        assert!(matches!(err, GeofenceError::InvalidObservation { .. }));
    }

    #[test]
    fn out_of_range_battery_is_rejected() {
        let mut observation = Observation::at(inside_point());
        observation.battery_level = Some(130.0);
        let err = engine()
            .apply_observation(&subject(Some(true)), &paddock(), &observation)
            .unwrap_err();
        assert!(matches!(err, GeofenceError::InvalidObservation { .. }));
    }

    #[test]
    fn degenerate_zone_fails_instead_of_guessing() {
        let zone = Zone::Circle {
            center: Coordinate::new(0.0, 0.0),
            radius_km: -2.0,
        };
        let err = engine()
            .apply_observation(&subject(Some(true)), &zone, &Observation::at(inside_point()))
            .unwrap_err();
        assert!(matches!(err, GeofenceError::InvalidZone { .. }));
    }

    #[test]
    fn polygon_zone_transitions_work_the_same() {
        let zone = Zone::Polygon {
            vertices: vec![
                Coordinate::new(40.7128, -74.0060),
                Coordinate::new(40.7138, -74.0060),
                Coordinate::new(40.7138, -74.0050),
                Coordinate::new(40.7128, -74.0050),
            ],
        };
        let inside = Coordinate::new(40.7133, -74.0055);
        let outside = Coordinate::new(40.7200, -74.0055);

        let result = engine()
            .apply_observation(&subject(Some(true)), &zone, &Observation::at(outside))
            .unwrap();
        assert_eq!(result.events[0].kind, EventKind::Exited);

        let result = engine()
            .apply_observation(&subject(Some(false)), &zone, &Observation::at(inside))
            .unwrap();
        assert_eq!(result.events[0].kind, EventKind::Entered);
    }
}
