// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-driven configuration for ports, database, auth, and tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Configuration management

/// Environment-based server configuration
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, ServerConfig, TrackingConfig,
};
