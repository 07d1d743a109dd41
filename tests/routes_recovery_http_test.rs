// ABOUTME: HTTP integration tests for recovery check-in routes
// ABOUTME: Verifies scoring with and without wearable data, history ordering, latest and stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use equilibria_server::models::WearableDataInput;
use equilibria_server::resources::ServerResources;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use uuid::Uuid;

fn approx(value: &Value, expected: f64) {
    let actual = value.as_f64().expect("expected a number");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn reading(hrv: f64, rhr: i64, sleep_minutes: i64, measured_hours_ago: i64) -> WearableDataInput {
    WearableDataInput {
        source: "apple_health".to_owned(),
        measurement_date: Utc::now() - Duration::hours(measured_hours_ago),
        hrv_rmssd: Some(hrv),
        hrv_sdnn: None,
        resting_heart_rate: Some(rhr),
        avg_heart_rate: None,
        sleep_duration_minutes: Some(sleep_minutes),
        deep_sleep_minutes: None,
        rem_sleep_minutes: None,
        steps: None,
        active_calories: None,
        raw_data: None,
    }
}

async fn log_recovery(resources: &Arc<ServerResources>, token: &str, payload: &Value) -> Value {
    AxumTestRequest::post("/api/v1/recovery/log")
        .bearer(token)
        .json(payload)
        .send(common::app(resources))
        .await
        .assert_status(StatusCode::CREATED)
        .json()
}

async fn user_token(resources: &Arc<ServerResources>) -> (Uuid, String) {
    let (user, token) = common::create_user_with_token(resources, "rec@example.com", "recovery")
        .await
        .unwrap();
    (user.id, token)
}

// ============================================================================
// POST /api/v1/recovery/log
// ============================================================================

#[tokio::test]
async fn test_log_without_wearable_data() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, token) = user_token(&resources).await;

    let body = log_recovery(
        &resources,
        &token,
        &json!({ "sleep_quality": 8, "soreness_level": 3, "energy_level": 8, "stress_level": 4 }),
    )
    .await;

    // 0.30x8 + 0.25x8 + 0.20x8 + 0.15x7 = 7.05
    approx(&body["recovery_score"], 7.1);
    assert_eq!(body["recommended_intensity"], "Moderate");
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["sleep_quality"], 8);
}

#[tokio::test]
async fn test_log_uses_recent_wearable_reading() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, token) = user_token(&resources).await;
    resources
        .database
        .upsert_wearable_data(user_id, &reading(65.0, 55, 480, 2))
        .await
        .unwrap();

    let body = log_recovery(
        &resources,
        &token,
        &json!({ "sleep_quality": 9, "soreness_level": 2, "energy_level": 9, "stress_level": 2 }),
    )
    .await;

    // base 8.1, 8h sleep, HRV 65 -> +0.4, RHR 55 -> +0.15
    approx(&body["recovery_score"], 8.7);
    assert_eq!(body["recommended_intensity"], "Heavy");
}

#[tokio::test]
async fn test_stale_wearable_reading_is_ignored() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, token) = user_token(&resources).await;
    resources
        .database
        .upsert_wearable_data(user_id, &reading(95.0, 45, 300, 72))
        .await
        .unwrap();

    let body = log_recovery(
        &resources,
        &token,
        &json!({ "sleep_quality": 8, "soreness_level": 3, "energy_level": 8, "stress_level": 4 }),
    )
    .await;

    approx(&body["recovery_score"], 7.1);
}

#[tokio::test]
async fn test_request_signals_fill_in_without_wearable() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    let body = log_recovery(
        &resources,
        &token,
        &json!({
            "sleep_quality": 8,
            "soreness_level": 3,
            "energy_level": 8,
            "stress_level": 4,
            "hrv_rmssd": 45.0,
            "resting_heart_rate": 58.0
        }),
    )
    .await;

    // 7.05 + 0.2 + 0.15
    approx(&body["recovery_score"], 7.4);
}

#[tokio::test]
async fn test_short_reported_sleep_lowers_score() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    let body = log_recovery(
        &resources,
        &token,
        &json!({
            "sleep_hours": 4.5,
            "sleep_quality": 3,
            "soreness_level": 8,
            "energy_level": 3,
            "stress_level": 8
        }),
    )
    .await;

    // base 2.7 x 0.8
    approx(&body["recovery_score"], 2.2);
    assert_eq!(body["recommended_intensity"], "Light/Rest");
}

#[tokio::test]
async fn test_empty_check_in_scores_defaults() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    let body = log_recovery(&resources, &token, &json!({})).await;

    approx(&body["recovery_score"], 4.9);
    assert_eq!(body["recommended_intensity"], "Light/Rest");
}

#[tokio::test]
async fn test_out_of_range_values_rejected() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    for payload in [
        json!({ "sleep_quality": 11 }),
        json!({ "stress_level": 0 }),
        json!({ "sleep_hours": 25.0 }),
    ] {
        let body: Value = AxumTestRequest::post("/api/v1/recovery/log")
            .bearer(&token)
            .json(&payload)
            .send(common::app(&resources))
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .json();
        assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
    }
}

#[tokio::test]
async fn test_log_requires_authentication() {
    let resources = common::create_test_resources().await.unwrap();

    AxumTestRequest::post("/api/v1/recovery/log")
        .json(&json!({ "sleep_quality": 8 }))
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// GET /api/v1/recovery/{history,latest,stats}
// ============================================================================

#[tokio::test]
async fn test_latest_without_data_is_not_found() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    let body: Value = AxumTestRequest::get("/api/v1/recovery/latest")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(body["error"]["message"], "No recovery data found");
}

#[tokio::test]
async fn test_history_latest_and_stats() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    let first = log_recovery(
        &resources,
        &token,
        &json!({ "sleep_quality": 8, "soreness_level": 3, "energy_level": 8, "stress_level": 4 }),
    )
    .await;
    let second = log_recovery(
        &resources,
        &token,
        &json!({
            "sleep_quality": 9,
            "soreness_level": 2,
            "energy_level": 9,
            "stress_level": 2,
            "hrv_rmssd": 65.0,
            "resting_heart_rate": 55.0
        }),
    )
    .await;

    let history: Vec<Value> = AxumTestRequest::get("/api/v1/recovery/history?days=7")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], second["id"]);
    assert_eq!(history[1]["id"], first["id"]);

    let latest: Value = AxumTestRequest::get("/api/v1/recovery/latest")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(latest["id"], second["id"]);

    let stats: Value = AxumTestRequest::get("/api/v1/recovery/stats")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(stats["total_logs"], 2);
    assert_eq!(stats["days_requested"], 30);
    approx(&stats["average_score"], 7.9);
    approx(&stats["highest_score"], 8.7);
    approx(&stats["lowest_score"], 7.1);
}

#[tokio::test]
async fn test_stats_without_data() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    let stats: Value = AxumTestRequest::get("/api/v1/recovery/stats?days=14")
        .bearer(&token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert!(stats["average_score"].is_null());
    assert_eq!(stats["total_logs"], 0);
    assert_eq!(stats["days_requested"], 14);
}

#[tokio::test]
async fn test_history_window_bounds() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;

    for days in ["0", "-5", "3651"] {
        AxumTestRequest::get(&format!("/api/v1/recovery/history?days={days}"))
            .bearer(&token)
            .send(common::app(&resources))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_history_is_scoped_to_user() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = user_token(&resources).await;
    let (_, other_token) =
        common::create_user_with_token(&resources, "other@example.com", "other_user")
            .await
            .unwrap();

    log_recovery(&resources, &token, &json!({ "sleep_quality": 7 })).await;

    let history: Vec<Value> = AxumTestRequest::get("/api/v1/recovery/history")
        .bearer(&other_token)
        .send(common::app(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(history.is_empty());
}
