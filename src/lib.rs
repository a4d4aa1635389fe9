// ABOUTME: Main library entry point for the Corral livestock tracking backend
// ABOUTME: Wires configuration, persistence, auth, and HTTP routes around the geofence engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

#![deny(unsafe_code)]

//! # Corral Server
//!
//! Backend for tracking collared livestock. Animals report GPS or Bluetooth
//! observations; the server classifies each animal as inside or outside the
//! configured safe zone and raises alerts on boundary exit and low battery.
//!
//! The containment and transition logic lives in the [`corral_core`] crate
//! and is pure; this crate is the collaborator around it:
//!
//! - **config**: environment-driven server configuration
//! - **database**: SQLite persistence for users, animals, zones, and events
//! - **services**: the tracking service serializing per-animal updates
//! - **routes**: the JSON HTTP surface (axum)
//! - **auth**: JWT session issuance and password hashing

/// Authentication and session management
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants and defaults
pub mod constants;

/// Database access layer
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware (authenticated-user extraction)
pub mod middleware;

/// Server-side data models
pub mod models;

/// HTTP routes for the JSON API
pub mod routes;

/// Domain services coordinating the engine and the store
pub mod services;
