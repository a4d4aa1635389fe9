// ABOUTME: Animal registry route handlers for collar registration and metadata
// ABOUTME: Owner-scoped CRUD over tracked animals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Animal registry routes.

use super::AppState;
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthedUser;
use crate::models::Animal;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

/// Collar registration request
#[derive(Debug, Deserialize)]
pub struct CreateAnimalRequest {
    pub name: String,
    pub device_id: String,
    #[serde(default)]
    pub ear_tag: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
}

/// Metadata update request; omitted fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateAnimalRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ear_tag: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
}

/// Animal route table
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route(
            "/:animal_id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

async fn create_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Json(request): Json<CreateAnimalRequest>,
) -> AppResult<(StatusCode, Json<Animal>)> {
    if request.name.trim().is_empty() {
        return Err(AppError::invalid_input("Animal name is required"));
    }
    if request.device_id.trim().is_empty() {
        return Err(AppError::invalid_input("Device ID is required"));
    }

    if state
        .database
        .get_animal_by_device(&request.device_id)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("Device ID already registered"));
    }

    // No location until the collar first reports; the engine establishes the
    // containment baseline silently on the first observation.
    let animal = Animal::new(
        authed.user.id,
        request.name.trim().to_owned(),
        request.device_id.trim().to_owned(),
        request.ear_tag,
        request
            .species
            .unwrap_or_else(|| defaults::SPECIES.to_owned()),
    );
    state.database.create_animal(&animal).await?;

    tracing::info!(
        "animal registered: {} (collar {})",
        animal.name,
        animal.device_id
    );
    Ok((StatusCode::CREATED, Json(animal)))
}

async fn list_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
) -> AppResult<Json<Vec<Animal>>> {
    Ok(Json(state.database.list_animals(authed.user.id).await?))
}

async fn get_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Path(animal_id): Path<Uuid>,
) -> AppResult<Json<Animal>> {
    let animal = state
        .database
        .get_animal_for_owner(animal_id, authed.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Animal"))?;
    Ok(Json(animal))
}

async fn update_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Path(animal_id): Path<Uuid>,
    Json(request): Json<UpdateAnimalRequest>,
) -> AppResult<Json<Animal>> {
    let animal = state
        .database
        .get_animal_for_owner(animal_id, authed.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Animal"))?;

    let name = request.name.unwrap_or(animal.name);
    let ear_tag = request.ear_tag.or(animal.ear_tag);
    let species = request.species.unwrap_or(animal.species);

    state
        .database
        .update_animal_meta(animal_id, &name, ear_tag.as_deref(), &species)
        .await?;

    let animal = state
        .database
        .get_animal(animal_id)
        .await?
        .ok_or_else(|| AppError::not_found("Animal"))?;
    Ok(Json(animal))
}

async fn delete_handler(
    State(state): State<AppState>,
    authed: AuthedUser,
    Path(animal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .database
        .get_animal_for_owner(animal_id, authed.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Animal"))?;

    state.database.delete_animal(animal_id).await?;
    Ok(Json(serde_json::json!({ "deleted": animal_id })))
}
