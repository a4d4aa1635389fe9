// ABOUTME: Pure containment evaluation for circular and polygonal safe zones
// ABOUTME: Haversine great-circle distance and even-odd ray-casting point-in-polygon
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Geometry evaluator: location in, containment out.
//!
//! Both containment models implement the same abstract contract
//! (coordinate → inside/outside) with different geometries. The functions
//! here are referentially transparent and safe to call concurrently from any
//! number of callers.

use crate::errors::GeofenceError;
use crate::models::{Coordinate, Zone};

/// Mean Earth radius in kilometers, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers.
///
/// Haversine formula:
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlng/2)`,
/// `c = 2·atan2(√a, √(1-a))`, `distance = R·c`.
/// Symmetric in its arguments. Inputs are degrees; all angles are converted
/// to radians before use.
#[must_use]
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Decide whether `point` lies inside `zone`.
///
/// Circle zones contain a point iff its haversine distance from the center is
/// at most the radius. Polygon zones use the even-odd rule over the closed
/// vertex ring. A point exactly on a polygon edge is an unspecified boundary
/// case: it may report either side.
///
/// # Errors
///
/// Returns [`GeofenceError::InvalidZone`] for degenerate zones (non-positive
/// radius, polygon under three vertices, non-finite zone coordinates) and
/// [`GeofenceError::InvalidObservation`] for an out-of-range or non-finite
/// point. A containment value is never guessed for bad input.
pub fn zone_contains(zone: &Zone, point: Coordinate) -> Result<bool, GeofenceError> {
    zone.validate()?;
    if !point.is_valid() {
        return Err(GeofenceError::invalid_observation(format!(
            "coordinate ({}, {}) out of range",
            point.latitude, point.longitude
        )));
    }

    match zone {
        Zone::Circle { center, radius_km } => {
            Ok(haversine_distance_km(*center, point) <= *radius_km)
        }
        Zone::Polygon { vertices } => Ok(point_in_polygon(vertices, point)),
    }
}

/// Even-odd ray cast: count edge crossings of a horizontal ray from `point`.
fn point_in_polygon(vertices: &[Coordinate], point: Coordinate) -> bool {
    let px = point.longitude;
    let py = point.latitude;

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let xi = vertices[i].longitude;
        let yi = vertices[i].latitude;
        let xj = vertices[j].longitude;
        let yj = vertices[j].latitude;

        let crosses = ((yi > py) != (yj > py)) && px < (xj - xi) * (py - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}
