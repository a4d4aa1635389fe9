// ABOUTME: System-wide constants and configuration defaults for the Corral server
// ABOUTME: Environment variable names, default values, and request limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Application constants, grouped by concern.

/// Environment variable names read by [`crate::config`]
pub mod env_keys {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Database connection string (sqlite path or `sqlite::memory:`)
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Secret used to sign JWT session tokens
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// JWT lifetime in hours
    pub const JWT_EXPIRY_HOURS: &str = "JWT_EXPIRY_HOURS";
    /// Battery percentage below which a low battery alert fires
    pub const LOW_BATTERY_THRESHOLD: &str = "LOW_BATTERY_THRESHOLD";
    /// JSON zone definition used for owners that have not configured one
    pub const DEFAULT_ZONE: &str = "DEFAULT_ZONE";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default values applied when the environment does not override them
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 5000;
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:./data/corral.db";
    /// Default JWT lifetime
    pub const JWT_EXPIRY_HOURS: i64 = 24;
    /// Default latitude of the fallback safe-zone center
    pub const ZONE_CENTER_LAT: f64 = -1.2921;
    /// Default longitude of the fallback safe-zone center
    pub const ZONE_CENTER_LNG: f64 = 36.8219;
    /// Default radius of the fallback safe zone in kilometers
    pub const ZONE_RADIUS_KM: f64 = 0.5;
    /// Default species recorded for a new animal when none is given
    pub const SPECIES: &str = "cattle";
}

/// Request validation limits
pub mod limits {
    /// Minimum accepted password length at registration
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Default page size for history queries
    pub const DEFAULT_HISTORY_LIMIT: u32 = 100;
    /// Upper bound for history query page size
    pub const MAX_HISTORY_LIMIT: u32 = 1000;
    /// Random-walk step applied per simulated movement, in degrees
    pub const SIMULATION_STEP_DEGREES: f64 = 0.001;
}

/// Service identity used in logs
pub mod service {
    /// Service name reported by logging and the health endpoint
    pub const NAME: &str = "corral-server";
}
