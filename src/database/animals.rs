// ABOUTME: Animal registry database operations
// ABOUTME: Collar registration, metadata updates, and tracked-state persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

use super::Database;
use crate::models::Animal;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use corral_core::AnimalStatus;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the animals table
    pub(super) async fn migrate_animals(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS animals (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                device_id TEXT UNIQUE NOT NULL,
                ear_tag TEXT UNIQUE,
                species TEXT NOT NULL DEFAULT 'cattle',
                latitude REAL,
                longitude REAL,
                containment INTEGER,
                status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'lost')),
                battery_level REAL,
                signal_strength REAL,
                last_seen DATETIME,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_animals_owner ON animals(owner_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_animals_device ON animals(device_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Register a new animal.
    ///
    /// # Errors
    ///
    /// Returns an error if the device id is already registered or the insert
    /// fails.
    pub async fn create_animal(&self, animal: &Animal) -> Result<Uuid> {
        if self
            .get_animal_by_device(&animal.device_id)
            .await?
            .is_some()
        {
            return Err(anyhow!(
                "Device ID already registered: {}",
                animal.device_id
            ));
        }

        sqlx::query(
            r"
            INSERT INTO animals (
                id, owner_id, name, device_id, ear_tag, species,
                latitude, longitude, containment, status,
                battery_level, signal_strength, last_seen, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(animal.id.to_string())
        .bind(animal.owner_id.to_string())
        .bind(&animal.name)
        .bind(&animal.device_id)
        .bind(&animal.ear_tag)
        .bind(&animal.species)
        .bind(animal.latitude)
        .bind(animal.longitude)
        .bind(animal.containment)
        .bind(animal.status.as_str())
        .bind(animal.battery_level)
        .bind(animal.signal_strength)
        .bind(animal.last_seen)
        .bind(animal.created_at)
        .execute(&self.pool)
        .await?;

        Ok(animal.id)
    }

    /// Get an animal by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn get_animal(&self, id: Uuid) -> Result<Option<Animal>> {
        let row = sqlx::query(&select_animals("WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_animal).transpose()
    }

    /// Get an animal by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn get_animal_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Animal>> {
        let row = sqlx::query(&select_animals("WHERE id = $1 AND owner_id = $2"))
            .bind(id.to_string())
            .bind(owner_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_animal).transpose()
    }

    /// Get an animal by its collar device id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn get_animal_by_device(&self, device_id: &str) -> Result<Option<Animal>> {
        let row = sqlx::query(&select_animals("WHERE device_id = $1"))
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_animal).transpose()
    }

    /// List all animals belonging to an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_animals(&self, owner_id: Uuid) -> Result<Vec<Animal>> {
        let rows = sqlx::query(&select_animals("WHERE owner_id = $1 ORDER BY created_at"))
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_animal).collect()
    }

    /// List an owner's animals that have a recorded location.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_located_animals(&self, owner_id: Uuid) -> Result<Vec<Animal>> {
        let rows = sqlx::query(&select_animals(
            "WHERE owner_id = $1 AND latitude IS NOT NULL AND longitude IS NOT NULL",
        ))
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_animal).collect()
    }

    /// Update mutable metadata of an animal.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_animal_meta(
        &self,
        id: Uuid,
        name: &str,
        ear_tag: Option<&str>,
        species: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE animals SET name = $2, ear_tag = $3, species = $4 WHERE id = $1")
            .bind(id.to_string())
            .bind(name)
            .bind(ear_tag)
            .bind(species)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete an animal and its dependent records.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_animal(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM animals WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Overwrite the tracked state after an engine evaluation.
    ///
    /// This is the single write path for location, containment, status, and
    /// telemetry, applied only with the engine's output.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_tracked_state(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
        containment: bool,
        status: AnimalStatus,
        battery_level: Option<f64>,
        signal_strength: Option<f64>,
        last_seen: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r"
            UPDATE animals SET
                latitude = $2,
                longitude = $3,
                containment = $4,
                status = $5,
                battery_level = COALESCE($6, battery_level),
                signal_strength = COALESCE($7, signal_strength),
                last_seen = $8
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(latitude)
        .bind(longitude)
        .bind(containment)
        .bind(status.as_str())
        .bind(battery_level)
        .bind(signal_strength)
        .bind(last_seen)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Overwrite containment/status without touching the stored location.
    ///
    /// Used by Bluetooth presence sweeps and zone re-checks where no new
    /// coordinate was reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn apply_presence_state(
        &self,
        id: Uuid,
        containment: bool,
        status: AnimalStatus,
        last_seen: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query(
            r"
            UPDATE animals SET
                containment = $2,
                status = $3,
                last_seen = COALESCE($4, last_seen)
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(containment)
        .bind(status.as_str())
        .bind(last_seen)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Convert a database row to an Animal struct
    fn row_to_animal(row: &sqlx::sqlite::SqliteRow) -> Result<Animal> {
        let id: String = row.get("id");
        let owner_id: String = row.get("owner_id");
        let status: String = row.get("status");
        Ok(Animal {
            id: Uuid::parse_str(&id)?,
            owner_id: Uuid::parse_str(&owner_id)?,
            name: row.get("name"),
            device_id: row.get("device_id"),
            ear_tag: row.get("ear_tag"),
            species: row.get("species"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            containment: row.get("containment"),
            status: status.parse()?,
            battery_level: row.get("battery_level"),
            signal_strength: row.get("signal_strength"),
            last_seen: row.get("last_seen"),
            created_at: row.get("created_at"),
        })
    }
}

fn select_animals(filter: &str) -> String {
    format!(
        r"
        SELECT id, owner_id, name, device_id, ear_tag, species,
               latitude, longitude, containment, status,
               battery_level, signal_strength, last_seen, created_at
        FROM animals {filter}
        "
    )
}
