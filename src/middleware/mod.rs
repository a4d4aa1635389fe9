// ABOUTME: HTTP middleware for request authentication and context extraction
// ABOUTME: Provides the authenticated-user extractor used by protected routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! HTTP middleware

/// Authenticated-user extraction from bearer tokens
pub mod auth;

pub use auth::AuthedUser;
