// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, auth, and seeded user/animal helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral
#![allow(dead_code)]

//! Shared test utilities for the Corral server.

use corral::auth::AuthManager;
use corral::config::TrackingConfig;
use corral::database::Database;
use corral::models::{Animal, User};
use corral::routes::AppState;
use corral::services::TrackingService;
use corral_core::{Coordinate, Zone};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database
pub async fn create_test_database() -> Arc<Database> {
    init_test_logging();
    Arc::new(
        Database::new("sqlite::memory:")
            .await
            .expect("in-memory database"),
    )
}

/// Test authentication manager with a fixed secret
pub fn create_test_auth_manager() -> Arc<AuthManager> {
    Arc::new(AuthManager::new(b"corral-test-secret", 24))
}

/// Tracking configuration with the default paddock zone
pub fn test_tracking_config() -> TrackingConfig {
    TrackingConfig {
        low_battery_threshold: 20.0,
        default_zone: Zone::Circle {
            center: Coordinate::new(-1.2921, 36.8219),
            radius_km: 0.5,
        },
    }
}

/// Tracking service over the given database with test configuration
pub fn create_tracking_service(database: Arc<Database>) -> Arc<TrackingService> {
    Arc::new(TrackingService::new(database, &test_tracking_config()))
}

/// Create a standard test user
pub async fn create_test_user(database: &Database) -> User {
    create_test_user_with_email(database, "farmer@example.com").await
}

/// Create a test user with a custom email
pub async fn create_test_user_with_email(database: &Database, email: &str) -> User {
    let user = User::new(
        email.to_owned(),
        corral::auth::hash_password("correct horse battery staple").expect("hash"),
        "Test Farmer".to_owned(),
    );
    database.create_user(&user).await.expect("create user");
    user
}

/// Register a test animal for the given owner
pub async fn create_test_animal(database: &Database, owner: &User, name: &str) -> Animal {
    let animal = Animal::new(
        owner.id,
        name.to_owned(),
        format!("collar-{name}"),
        None,
        "cattle".to_owned(),
    );
    database
        .create_animal(&animal)
        .await
        .expect("create animal");
    animal
}

/// Full application state over an in-memory store
pub async fn create_test_state() -> AppState {
    let database = create_test_database().await;
    let tracking = create_tracking_service(Arc::clone(&database));
    AppState {
        database,
        auth: create_test_auth_manager(),
        tracking,
    }
}

/// A point well inside the test paddock
pub fn inside_point() -> Coordinate {
    Coordinate::new(-1.2921, 36.8219)
}

/// A point well outside the test paddock
pub fn outside_point() -> Coordinate {
    Coordinate::new(-1.35, 36.9)
}
