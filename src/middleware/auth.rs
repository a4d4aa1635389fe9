// ABOUTME: Authentication middleware for request authentication and authorization
// ABOUTME: Validates bearer JWTs and resolves the requesting user from the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! Bearer-token authentication for protected routes.
//!
//! Handlers take an [`AuthedUser`] argument; extraction validates the
//! `Authorization: Bearer` header against the auth manager and loads the
//! account, so a handler body only ever sees a real user.

use crate::errors::AppError;
use crate::models::User;
use crate::routes::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// The authenticated account behind the current request.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    /// The resolved account record
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("expected a bearer token"))?;

        let claims = state.auth.validate_token(token)?;
        let user_id = claims.user_id()?;

        let user = state
            .database
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("unknown user"))?;

        Ok(Self { user })
    }
}
