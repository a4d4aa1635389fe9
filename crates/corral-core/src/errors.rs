// ABOUTME: Typed error definitions for geofence evaluation and observation handling
// ABOUTME: Distinguishes degenerate zone configuration from invalid reported observations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Typed failures for the geofence engine.
//!
//! The engine never guesses: a zone that cannot be evaluated or an
//! observation that cannot be trusted is surfaced to the caller instead of
//! being defaulted to a containment result.

use thiserror::Error;

/// Failures produced by the geometry evaluator and the status engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeofenceError {
    /// The zone configuration is geometrically degenerate: non-positive or
    /// non-finite radius, fewer than three polygon vertices, or a vertex
    /// outside valid coordinate ranges.
    #[error("invalid zone: {reason}")]
    InvalidZone {
        /// What made the zone unusable
        reason: String,
    },

    /// The reported observation cannot be evaluated: coordinate missing,
    /// non-finite, or out of valid range, or telemetry outside its domain.
    #[error("invalid observation: {reason}")]
    InvalidObservation {
        /// What made the observation unusable
        reason: String,
    },
}

impl GeofenceError {
    /// Build an `InvalidZone` error with the given reason.
    pub fn invalid_zone(reason: impl Into<String>) -> Self {
        Self::InvalidZone {
            reason: reason.into(),
        }
    }

    /// Build an `InvalidObservation` error with the given reason.
    pub fn invalid_observation(reason: impl Into<String>) -> Self {
        Self::InvalidObservation {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = GeofenceError::invalid_zone("radius must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "invalid zone: radius must be positive, got -1"
        );

        let err = GeofenceError::invalid_observation("latitude 91 out of range");
        assert_eq!(
            err.to_string(),
            "invalid observation: latitude 91 out of range"
        );
    }
}
