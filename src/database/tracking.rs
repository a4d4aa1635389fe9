// ABOUTME: Raw telemetry database operations
// ABOUTME: Append-only tracking points with per-animal history queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

use super::Database;
use crate::models::TrackingPoint;
use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the tracking points table
    pub(super) async fn migrate_tracking(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tracking_points (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL REFERENCES animals(id) ON DELETE CASCADE,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                speed REAL,
                battery_level REAL,
                signal_strength REAL,
                notes TEXT,
                recorded_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_tracking_animal_time
             ON tracking_points(animal_id, recorded_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append one telemetry point.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert_tracking_point(&self, point: &TrackingPoint) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO tracking_points (
                id, animal_id, latitude, longitude, speed,
                battery_level, signal_strength, notes, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(point.id.to_string())
        .bind(point.animal_id.to_string())
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(point.speed)
        .bind(point.battery_level)
        .bind(point.signal_strength)
        .bind(&point.notes)
        .bind(point.recorded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Most recent telemetry points for an animal, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_tracking_points(
        &self,
        animal_id: Uuid,
        limit: u32,
    ) -> Result<Vec<TrackingPoint>> {
        let rows = sqlx::query(
            r"
            SELECT id, animal_id, latitude, longitude, speed,
                   battery_level, signal_strength, notes, recorded_at
            FROM tracking_points
            WHERE animal_id = $1
            ORDER BY recorded_at DESC
            LIMIT $2
            ",
        )
        .bind(animal_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let animal_id: String = row.get("animal_id");
                Ok(TrackingPoint {
                    id: Uuid::parse_str(&id)?,
                    animal_id: Uuid::parse_str(&animal_id)?,
                    latitude: row.get("latitude"),
                    longitude: row.get("longitude"),
                    speed: row.get("speed"),
                    battery_level: row.get("battery_level"),
                    signal_strength: row.get("signal_strength"),
                    notes: row.get("notes"),
                    recorded_at: row.get("recorded_at"),
                })
            })
            .collect()
    }
}
