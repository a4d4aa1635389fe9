// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, env_keys};
use anyhow::{Context, Result};
use corral_core::{Coordinate, Zone, DEFAULT_LOW_BATTERY_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Environment type for deployment-specific behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a connection string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_string(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign JWT session tokens
    pub jwt_secret: String,
    /// JWT expiry time in hours
    pub jwt_expiry_hours: i64,
}

/// Tracking and geofence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Battery percentage below which a low battery alert fires
    pub low_battery_threshold: f64,
    /// Zone used for owners that have not configured one. Explicit
    /// configuration passed into the engine per call; there is no
    /// process-wide mutable default.
    pub default_zone: Zone,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            low_battery_threshold: DEFAULT_LOW_BATTERY_THRESHOLD,
            default_zone: Zone::Circle {
                center: Coordinate::new(defaults::ZONE_CENTER_LAT, defaults::ZONE_CENTER_LNG),
                radius_km: defaults::ZONE_RADIUS_KM,
            },
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Tracking and geofence configuration
    pub tracking: TrackingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse, if the configured
    /// default zone is invalid, or if `JWT_SECRET` is missing in production.
    pub fn from_env() -> Result<Self> {
        let http_port = env_var_or(env_keys::HTTP_PORT, &defaults::HTTP_PORT.to_string())
            .parse()
            .context("Invalid HTTP_PORT value")?;

        let environment = Environment::from_str_or_default(&env_var_or(
            env_keys::ENVIRONMENT,
            "development",
        ));

        let database = DatabaseConfig {
            url: DatabaseUrl::parse_url(&env_var_or(
                env_keys::DATABASE_URL,
                defaults::DATABASE_URL,
            )),
        };

        let jwt_secret = match env::var(env_keys::JWT_SECRET) {
            Ok(secret) => secret,
            Err(_) if environment.is_production() => {
                anyhow::bail!("JWT_SECRET must be set in production");
            }
            Err(_) => {
                warn!("JWT_SECRET not set, generating an ephemeral secret for this process");
                crate::auth::generate_jwt_secret()
            }
        };

        let auth = AuthConfig {
            jwt_secret,
            jwt_expiry_hours: env_var_or(
                env_keys::JWT_EXPIRY_HOURS,
                &defaults::JWT_EXPIRY_HOURS.to_string(),
            )
            .parse()
            .context("Invalid JWT_EXPIRY_HOURS value")?,
        };

        let low_battery_threshold = env_var_or(
            env_keys::LOW_BATTERY_THRESHOLD,
            &DEFAULT_LOW_BATTERY_THRESHOLD.to_string(),
        )
        .parse()
        .context("Invalid LOW_BATTERY_THRESHOLD value")?;

        let default_zone = match env::var(env_keys::DEFAULT_ZONE) {
            Ok(json) => {
                let zone: Zone =
                    serde_json::from_str(&json).context("Invalid DEFAULT_ZONE JSON")?;
                zone.validate()
                    .map_err(|e| anyhow::anyhow!("Invalid DEFAULT_ZONE: {e}"))?;
                zone
            }
            Err(_) => TrackingConfig::default().default_zone,
        };

        Ok(Self {
            http_port,
            environment,
            database,
            auth,
            tracking: TrackingConfig {
                low_battery_threshold,
                default_zone,
            },
        })
    }

    /// One-line summary for startup logging; never includes secrets.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} env={} database={} low_battery_threshold={}",
            self.http_port,
            self.environment,
            self.database.url,
            self.tracking.low_battery_threshold
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
