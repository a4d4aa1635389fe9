// ABOUTME: Database management for the Corral tracking server
// ABOUTME: SQLite pool setup, schema migrations, and per-domain operation modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! # Database Management
//!
//! SQLite persistence for users, animals, zone configuration, telemetry, and
//! events. Migrations are idempotent `CREATE TABLE IF NOT EXISTS` statements
//! run at startup.

mod animals;
mod events;
mod geofences;
mod tracking;
mod users;

pub use events::AlertView;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for the tracking store
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_animals().await?;
        self.migrate_geofences().await?;
        self.migrate_tracking().await?;
        self.migrate_events().await?;
        Ok(())
    }
}
