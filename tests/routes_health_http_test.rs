// ABOUTME: HTTP integration tests for health probes and shared middleware
// ABOUTME: Checks liveness, readiness, request id propagation, CORS and unknown paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint() {
    let resources = common::create_test_resources().await.unwrap();

    let body: Value = AxumTestRequest::get("/health")
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "equilibria-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_pings_database() {
    let resources = common::create_test_resources().await.unwrap();

    let body: Value = AxumTestRequest::get("/ready")
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let resources = common::create_test_resources().await.unwrap();

    let generated = AxumTestRequest::get("/health")
        .send(common::app(&resources))
        .await;
    let id = generated.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let echoed = AxumTestRequest::get("/health")
        .header("x-request-id", "client-supplied-id")
        .send(common::app(&resources))
        .await;
    assert_eq!(echoed.header("x-request-id"), Some("client-supplied-id"));
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_in_tests() {
    let resources = common::create_test_resources().await.unwrap();

    let response = AxumTestRequest::options("/api/v1/auth/login")
        .header("origin", "http://localhost:19006")
        .header("access-control-request-method", "POST")
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let resources = common::create_test_resources().await.unwrap();

    AxumTestRequest::get("/api/v1/does-not-exist")
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let resources = common::create_test_resources().await.unwrap();
    let padding = "x".repeat(equilibria_server::constants::limits::MAX_REQUEST_SIZE + 1);

    let response = AxumTestRequest::post("/api/v1/auth/register")
        .json(&serde_json::json!({
            "email": "big@example.com",
            "username": padding,
            "password": "testpassword123",
        }))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 413);
}

#[tokio::test]
async fn test_malformed_json_is_rejected_before_handlers() {
    let resources = common::create_test_resources().await.unwrap();

    let syntax = AxumTestRequest::post("/api/v1/auth/register")
        .raw_body("application/json", "{\"email\": ")
        .send(common::app(&resources))
        .await;
    assert_eq!(syntax.status(), 400);

    let wrong_type = AxumTestRequest::post("/api/v1/auth/register")
        .raw_body("application/json", "{\"email\": 5, \"username\": \"a\", \"password\": \"b\"}")
        .send(common::app(&resources))
        .await;
    assert_eq!(wrong_type.status(), 422);
}
