// ABOUTME: Property-style tests for the geofence evaluator and status engine
// ABOUTME: Exercises containment boundaries, transition rules, and determinism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

use chrono::{TimeZone, Utc};
use corral_core::{
    haversine_distance_km, zone_contains, AnimalStatus, Coordinate, EventKind, GeofenceError,
    Observation, StatusEngine, SubjectSnapshot, Zone,
};
use uuid::Uuid;

fn snapshot(containment: Option<bool>) -> SubjectSnapshot {
    SubjectSnapshot {
        subject_id: Uuid::new_v4(),
        name: "Dottie".into(),
        containment,
        status: AnimalStatus::Active,
    }
}

#[test]
fn center_is_contained_for_any_positive_radius() {
    let center = Coordinate::new(47.3769, 8.5417);
    for radius_km in [1e-6, 0.1, 1.0, 42.0, 10_000.0] {
        let zone = Zone::Circle {
            center,
            radius_km,
        };
        assert!(
            zone_contains(&zone, center).unwrap(),
            "center must be inside at radius {radius_km}"
        );
    }
}

#[test]
fn containment_respects_the_radius_within_tolerance() {
    let center = Coordinate::new(0.0, 0.0);
    let zone = Zone::Circle {
        center,
        radius_km: 55.0,
    };

    // Points on the equator: 1 degree of longitude is ~111.19 km
    let inside = Coordinate::new(0.0, 0.49);
    let outside = Coordinate::new(0.0, 0.51);
    assert!(haversine_distance_km(center, inside) < 55.0);
    assert!(haversine_distance_km(center, outside) > 55.0);

    assert!(zone_contains(&zone, inside).unwrap());
    assert!(!zone_contains(&zone, outside).unwrap());
}

#[test]
fn haversine_symmetry_over_assorted_pairs() {
    let points = [
        Coordinate::new(-1.2921, 36.8219),
        Coordinate::new(40.7128, -74.0060),
        Coordinate::new(-33.8688, 151.2093),
        Coordinate::new(78.2232, 15.6267),
    ];
    for a in points {
        for b in points {
            let ab = haversine_distance_km(a, b);
            let ba = haversine_distance_km(b, a);
            assert!((ab - ba).abs() < 1e-9, "asymmetric for {a:?} / {b:?}");
        }
    }
}

#[test]
fn square_polygon_from_the_contract() {
    let zone = Zone::Polygon {
        vertices: vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 0.0),
        ],
    };
    assert!(zone_contains(&zone, Coordinate::new(5.0, 5.0)).unwrap());
    assert!(!zone_contains(&zone, Coordinate::new(50.0, 50.0)).unwrap());
}

#[test]
fn full_transition_sequence_emits_each_event_once() {
    let engine = StatusEngine::default();
    let zone = Zone::Circle {
        center: Coordinate::new(0.0, 0.0),
        radius_km: 10.0,
    };
    let inside = Coordinate::new(0.01, 0.01);
    let outside = Coordinate::new(2.0, 2.0);

    // First sighting: baseline, no event
    let first = engine
        .apply_observation(&snapshot(None), &zone, &Observation::at(inside))
        .unwrap();
    assert!(first.events.is_empty());
    assert!(first.containment);

    // Walks out: exactly one exited event
    let exit = engine
        .apply_observation(&snapshot(Some(true)), &zone, &Observation::at(outside))
        .unwrap();
    assert_eq!(exit.events.len(), 1);
    assert_eq!(exit.events[0].kind, EventKind::Exited);
    assert_eq!(exit.status, AnimalStatus::Lost);

    // Stays out: quiet
    let still_out = engine
        .apply_observation(&snapshot(Some(false)), &zone, &Observation::at(outside))
        .unwrap();
    assert!(still_out.events.is_empty());

    // Comes back: exactly one entered event
    let reentry = engine
        .apply_observation(&snapshot(Some(false)), &zone, &Observation::at(inside))
        .unwrap();
    assert_eq!(reentry.events.len(), 1);
    assert_eq!(reentry.events[0].kind, EventKind::Entered);
    assert_eq!(reentry.status, AnimalStatus::Active);
}

#[test]
fn exit_with_low_battery_emits_both_in_order() {
    let engine = StatusEngine::default();
    let zone = Zone::Circle {
        center: Coordinate::new(0.0, 0.0),
        radius_km: 10.0,
    };
    let mut observation = Observation::at(Coordinate::new(2.0, 2.0));
    observation.battery_level = Some(15.0);

    let result = engine
        .apply_observation(&snapshot(Some(true)), &zone, &observation)
        .unwrap();
    let kinds: Vec<EventKind> = result.events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Exited, EventKind::LowBattery]);
}

#[test]
fn evaluation_is_deterministic_with_a_pinned_timestamp() {
    let engine = StatusEngine::default();
    let zone = Zone::Polygon {
        vertices: vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 0.0),
        ],
    };
    let subject = snapshot(Some(true));
    let mut observation = Observation::at(Coordinate::new(20.0, 20.0));
    observation.battery_level = Some(10.0);
    observation.observed_at = Some(Utc.with_ymd_and_hms(2026, 7, 1, 6, 30, 0).unwrap());

    let first = engine
        .apply_observation(&subject, &zone, &observation)
        .unwrap();
    let second = engine
        .apply_observation(&subject, &zone, &observation)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn degenerate_zones_fail_for_every_observation() {
    let engine = StatusEngine::default();
    let zones = [
        Zone::Circle {
            center: Coordinate::new(0.0, 0.0),
            radius_km: 0.0,
        },
        Zone::Circle {
            center: Coordinate::new(0.0, 0.0),
            radius_km: -3.0,
        },
        Zone::Polygon {
            vertices: vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)],
        },
        Zone::Circle {
            center: Coordinate::new(f64::NAN, 0.0),
            radius_km: 1.0,
        },
    ];

    for zone in zones {
        let err = engine
            .apply_observation(
                &snapshot(Some(true)),
                &zone,
                &Observation::at(Coordinate::new(0.0, 0.0)),
            )
            .unwrap_err();
        assert!(
            matches!(err, GeofenceError::InvalidZone { .. }),
            "expected InvalidZone for {zone:?}"
        );
    }
}
