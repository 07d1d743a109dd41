// ABOUTME: HTTP integration tests for authentication routes
// ABOUTME: Covers registration, form login, logout, /auth/me, and bearer token failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use equilibria_server::auth::Claims;
use helpers::axum_test::AxumTestRequest;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

fn register_body(email: &str, username: &str, password: &str) -> Value {
    json!({ "email": email, "username": username, "password": password })
}

// ============================================================================
// POST /api/v1/auth/register
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let resources = common::create_test_resources().await.unwrap();

    let body: Value = AxumTestRequest::post("/api/v1/auth/register")
        .json(&register_body("Runner@Example.com", "runner", "securepass1"))
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    assert_eq!(body["email"], "runner@example.com");
    assert_eq!(body["username"], "runner");
    assert_eq!(body["is_active"], true);
    assert!(body.get("password_hash").is_none());
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let resources = common::create_test_resources().await.unwrap();
    common::create_test_user(&resources, "taken@example.com", "first")
        .await
        .unwrap();

    let body: Value = AxumTestRequest::post("/api/v1/auth/register")
        .json(&register_body("TAKEN@example.com", "second", "securepass1"))
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(body["error"]["message"], "Email already registered");
}

#[tokio::test]
async fn test_register_duplicate_username_rejected() {
    let resources = common::create_test_resources().await.unwrap();
    common::create_test_user(&resources, "one@example.com", "athlete")
        .await
        .unwrap();

    let body: Value = AxumTestRequest::post("/api/v1/auth/register")
        .json(&register_body("two@example.com", "athlete", "securepass1"))
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(body["error"]["message"], "Username already taken");
}

#[tokio::test]
async fn test_register_validation_failures() {
    let resources = common::create_test_resources().await.unwrap();

    for payload in [
        register_body("not-an-email", "valid_user", "securepass1"),
        register_body("ok@example.com", "ab", "securepass1"),
        register_body("ok@example.com", "valid_user", "short"),
    ] {
        let body: Value = AxumTestRequest::post("/api/v1/auth/register")
            .json(&payload)
            .send(common::app(&resources))
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .json();
        assert!(body["error"]["code"].is_string());
    }
}

// ============================================================================
// POST /api/v1/auth/login
// ============================================================================

#[tokio::test]
async fn test_login_with_username_and_email() {
    let resources = common::create_test_resources().await.unwrap();
    common::create_test_user(&resources, "lifter@example.com", "lifter")
        .await
        .unwrap();

    for identifier in ["lifter", "lifter@example.com"] {
        let body: Value = AxumTestRequest::post("/api/v1/auth/login")
            .form(&[("username", identifier), ("password", common::TEST_PASSWORD)])
            .send(common::app(&resources))
            .await
            .assert_status(StatusCode::OK)
            .json();

        assert_eq!(body["token_type"], "bearer");
        let token = body["access_token"].as_str().unwrap();
        let claims = resources.auth_manager.validate_token(token).unwrap();
        assert_eq!(claims.username, "lifter");
    }
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_look_identical() {
    let resources = common::create_test_resources().await.unwrap();
    common::create_test_user(&resources, "lifter@example.com", "lifter")
        .await
        .unwrap();

    let wrong_password: Value = AxumTestRequest::post("/api/v1/auth/login")
        .form(&[("username", "lifter"), ("password", "not-the-password")])
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();

    let unknown_user: Value = AxumTestRequest::post("/api/v1/auth/login")
        .form(&[("username", "nobody"), ("password", "whatever123")])
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(
        wrong_password["error"]["message"],
        "Incorrect username or password"
    );
}

#[tokio::test]
async fn test_login_inactive_account_forbidden() {
    let resources = common::create_test_resources().await.unwrap();
    let user = common::create_test_user(&resources, "gone@example.com", "gone")
        .await
        .unwrap();
    resources.database.deactivate_user(user.id).await.unwrap();

    let body: Value = AxumTestRequest::post("/api/v1/auth/login")
        .form(&[("username", "gone"), ("password", common::TEST_PASSWORD)])
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();

    assert_eq!(body["error"]["code"], "ACCOUNT_INACTIVE");
}

// ============================================================================
// GET /api/v1/auth/me and POST /api/v1/auth/logout
// ============================================================================

#[tokio::test]
async fn test_me_returns_current_user() {
    let resources = common::create_test_resources().await.unwrap();
    let (user, token) = common::create_user_with_token(&resources, "me@example.com", "me_user")
        .await
        .unwrap();

    let body: Value = AxumTestRequest::get("/api/v1/auth/me")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["username"], "me_user");
}

#[tokio::test]
async fn test_logout_acknowledges_valid_token() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_user_with_token(&resources, "out@example.com", "out_user")
        .await
        .unwrap();

    let body: Value = AxumTestRequest::post("/api/v1/auth/logout")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["message"], "Successfully logged out");
}

#[tokio::test]
async fn test_missing_and_malformed_credentials() {
    let resources = common::create_test_resources().await.unwrap();

    let missing: Value = AxumTestRequest::get("/api/v1/auth/me")
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(missing["error"]["code"], "AUTH_REQUIRED");

    AxumTestRequest::get("/api/v1/auth/me")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    AxumTestRequest::get("/api/v1/auth/me")
        .bearer("not.a.jwt")
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let resources = common::create_test_resources().await.unwrap();
    let user = common::create_test_user(&resources, "late@example.com", "late_user")
        .await
        .unwrap();

    let issued = Utc::now() - Duration::hours(2);
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        iat: issued.timestamp(),
        exp: (issued + Duration::hours(1)).timestamp(),
        aud: "equilibria-api".to_owned(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(resources.config.auth.secret_key.as_bytes()),
    )
    .unwrap();

    let body: Value = AxumTestRequest::get("/api/v1/auth/me")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["error"]["code"], "AUTH_EXPIRED");
}

#[tokio::test]
async fn test_token_for_deleted_user_rejected() {
    let resources = common::create_test_resources().await.unwrap();
    let stranger = equilibria_server::models::User::new(
        "ghost@example.com".to_owned(),
        "ghost".to_owned(),
        "hash".to_owned(),
    );
    let (token, _) = resources.auth_manager.generate_token(&stranger).unwrap();

    let body: Value = AxumTestRequest::get("/api/v1/auth/me")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["error"]["message"], "Could not validate credentials");
}
