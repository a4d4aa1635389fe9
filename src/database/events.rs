// ABOUTME: Event and alert database operations
// ABOUTME: Append-only transition/battery events with a read flag for the alert panel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

use super::Database;
use crate::models::EventRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use corral_core::EventKind;
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

/// An event joined with its animal's name, as shown in the alert panel.
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    /// Event id
    pub id: Uuid,
    /// The animal the event is about
    pub animal_id: Uuid,
    /// Animal display name
    pub animal_name: String,
    /// What happened
    pub kind: EventKind,
    /// Human-readable description
    pub message: String,
    /// Latitude where the event was observed, when known
    pub latitude: Option<f64>,
    /// Longitude where the event was observed, when known
    pub longitude: Option<f64>,
    /// Whether the alert has been acknowledged
    pub is_read: bool,
    /// When the event was observed
    pub created_at: DateTime<Utc>,
}

impl Database {
    /// Create the events table
    pub(super) async fn migrate_events(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL REFERENCES animals(id) ON DELETE CASCADE,
                kind TEXT NOT NULL CHECK (kind IN ('entered', 'exited', 'low_battery')),
                message TEXT NOT NULL,
                latitude REAL,
                longitude REAL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_events_animal_time ON events(animal_id, created_at)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_unread ON events(is_read)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Append one event record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert_event(&self, event: &EventRecord) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO events (
                id, animal_id, kind, message, latitude, longitude, is_read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(event.id.to_string())
        .bind(event.animal_id.to_string())
        .bind(event.kind.as_str())
        .bind(&event.message)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(event.is_read)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List an owner's events, newest first, optionally filtered by kind and
    /// read state.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_events(
        &self,
        owner_id: Uuid,
        limit: u32,
        kind: Option<EventKind>,
        unread_only: bool,
    ) -> Result<Vec<AlertView>> {
        let rows = sqlx::query(
            r"
            SELECT e.id, e.animal_id, a.name AS animal_name, e.kind, e.message,
                   e.latitude, e.longitude, e.is_read, e.created_at
            FROM events e
            JOIN animals a ON a.id = e.animal_id
            WHERE a.owner_id = $1
              AND ($2 IS NULL OR e.kind = $2)
              AND (NOT $3 OR e.is_read = 0)
            ORDER BY e.created_at DESC
            LIMIT $4
            ",
        )
        .bind(owner_id.to_string())
        .bind(kind.map(|k| k.as_str()))
        .bind(unread_only)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_alert_view).collect()
    }

    /// Mark one event as read.
    ///
    /// Returns `false` when no event with that id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn mark_event_read(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE events SET is_read = 1 WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count unread events for an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_unread_events(&self, owner_id: Uuid) -> Result<i64> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS n
            FROM events e
            JOIN animals a ON a.id = e.animal_id
            WHERE a.owner_id = $1 AND e.is_read = 0
            ",
        )
        .bind(owner_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    fn row_to_alert_view(row: &sqlx::sqlite::SqliteRow) -> Result<AlertView> {
        let id: String = row.get("id");
        let animal_id: String = row.get("animal_id");
        let kind: String = row.get("kind");
        Ok(AlertView {
            id: Uuid::parse_str(&id)?,
            animal_id: Uuid::parse_str(&animal_id)?,
            animal_name: row.get("animal_name"),
            kind: kind.parse()?,
            message: row.get("message"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            is_read: row.get("is_read"),
            created_at: row.get("created_at"),
        })
    }
}
