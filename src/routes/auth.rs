// ABOUTME: User authentication route handlers for registration, login, and sessions
// ABOUTME: REST endpoints issuing JWT session tokens over bcrypt-verified credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Authentication routes.

use super::AppState;
use crate::auth::{hash_password, verify_password};
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthedUser;
use crate::models::User;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User info embedded in auth responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

/// Session issuance response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub access_token: String,
}

/// Auth route table
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .route("/logout", post(logout_handler))
}

async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    tracing::info!("registration attempt for {}", request.email);

    if !is_valid_email(&request.email) {
        return Err(AppError::invalid_input("Invalid email format"));
    }
    if request.password.len() < limits::MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {} characters",
            limits::MIN_PASSWORD_LENGTH
        )));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::invalid_input("Name is required"));
    }

    if state
        .database
        .get_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("Email already registered"));
    }

    let password_hash = hash_password(&request.password)?;
    let user = User::new(request.email, password_hash, request.name.trim().to_owned());
    state.database.create_user(&user).await?;

    let access_token = state.auth.generate_token(&user)?;
    tracing::info!("user registered: {} ({})", user.email, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserInfo::from(&user),
            access_token,
        }),
    ))
}

async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .database
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

    if !verify_password(&request.password, &user.password_hash).await? {
        tracing::warn!("invalid password for {}", request.email);
        return Err(AppError::auth_invalid("Invalid email or password"));
    }

    let access_token = state.auth.generate_token(&user)?;

    Ok(Json(AuthResponse {
        user: UserInfo::from(&user),
        access_token,
    }))
}

async fn me_handler(authed: AuthedUser) -> Json<UserInfo> {
    Json(UserInfo::from(&authed.user))
}

async fn logout_handler(_authed: AuthedUser) -> Json<serde_json::Value> {
    // Tokens are stateless; the client discards its copy.
    Json(serde_json::json!({ "message": "Logged out successfully" }))
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
