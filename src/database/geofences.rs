// ABOUTME: Zone configuration database operations
// ABOUTME: One stored safe-zone definition per owner, serialized as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

use super::Database;
use anyhow::Result;
use chrono::Utc;
use corral_core::Zone;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the geofences table
    pub(super) async fn migrate_geofences(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS geofences (
                owner_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                zone TEXT NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get the stored zone for an owner, if one was configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored JSON is corrupt.
    pub async fn get_zone(&self, owner_id: Uuid) -> Result<Option<Zone>> {
        let row = sqlx::query("SELECT zone FROM geofences WHERE owner_id = $1")
            .bind(owner_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let json: String = row.get("zone");
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Store the zone for an owner, replacing any previous definition.
    ///
    /// The zone must already be validated; corrupt geometry never reaches
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the upsert fails.
    pub async fn set_zone(&self, owner_id: Uuid, zone: &Zone) -> Result<()> {
        let json = serde_json::to_string(zone)?;
        sqlx::query(
            r"
            INSERT INTO geofences (owner_id, zone, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (owner_id) DO UPDATE SET zone = $2, updated_at = $3
            ",
        )
        .bind(owner_id.to_string())
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
