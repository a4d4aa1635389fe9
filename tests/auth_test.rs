// ABOUTME: Integration tests for authentication over an in-memory store
// ABOUTME: Covers registration uniqueness, password verification, and token validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

mod common;

use common::{create_test_auth_manager, create_test_database, create_test_user};
use corral::auth::{hash_password, verify_password, AuthManager};
use corral::models::User;

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let database = create_test_database().await;
    create_test_user(&database).await;

    let duplicate = User::new(
        "farmer@example.com".into(),
        hash_password("another password").unwrap(),
        "Impostor".into(),
    );
    assert!(database.create_user(&duplicate).await.is_err());
}

#[tokio::test]
async fn login_flow_round_trips_through_the_store() {
    let database = create_test_database().await;
    let auth = create_test_auth_manager();
    let user = create_test_user(&database).await;

    // Lookup by email, verify password, issue and validate a token
    let stored = database
        .get_user_by_email(&user.email)
        .await
        .unwrap()
        .expect("user exists");
    assert!(
        verify_password("correct horse battery staple", &stored.password_hash)
            .await
            .unwrap()
    );
    assert!(!verify_password("wrong", &stored.password_hash).await.unwrap());

    let token = auth.generate_token(&stored).unwrap();
    let claims = auth.validate_token(&token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);

    let resolved = database
        .get_user_by_id(claims.user_id().unwrap())
        .await
        .unwrap()
        .expect("user resolvable from claims");
    assert_eq!(resolved.email, user.email);
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let database = create_test_database().await;
    let user = create_test_user(&database).await;

    // Negative expiry: the token is already expired when issued
    let auth = AuthManager::new(b"corral-test-secret", -1);
    let token = auth.generate_token(&user).unwrap();
    let err = auth.validate_token(&token).unwrap_err();
    assert_eq!(err.code, corral::errors::ErrorCode::AuthExpired);
}
