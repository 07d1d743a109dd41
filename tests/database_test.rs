// ABOUTME: Integration tests for the SQLite storage layer
// ABOUTME: Exercises users, recovery logs, wearable upserts, workouts and sessions directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, TimeZone, Utc};
use equilibria_server::config::DatabaseUrl;
use equilibria_server::database::Database;
use equilibria_server::models::{
    ExercisePerformance, RecoveryLog, TrainingIntensity, User, WearableDataInput, Workout,
    WorkoutCreate, WorkoutSession,
};
use serde_json::json;
use uuid::Uuid;

fn test_user(email: &str, username: &str) -> User {
    User::new(email.to_owned(), username.to_owned(), "hash".to_owned())
}

fn wearable(source: &str, days_ago: i64) -> WearableDataInput {
    WearableDataInput {
        source: source.to_owned(),
        measurement_date: Utc.with_ymd_and_hms(2026, 1, 20, 6, 0, 0).unwrap()
            - Duration::days(days_ago),
        hrv_rmssd: None,
        hrv_sdnn: None,
        resting_heart_rate: None,
        avg_heart_rate: None,
        sleep_duration_minutes: None,
        deep_sleep_minutes: None,
        rem_sleep_minutes: None,
        steps: None,
        active_calories: None,
        raw_data: None,
    }
}

fn recovery_log(user_id: Uuid, hours_ago: i64, score: Option<f64>) -> RecoveryLog {
    let date = Utc::now() - Duration::hours(hours_ago);
    RecoveryLog {
        id: Uuid::new_v4(),
        user_id,
        date,
        sleep_hours: Some(7.5),
        sleep_quality: Some(7),
        soreness_level: Some(3),
        energy_level: Some(7),
        stress_level: Some(4),
        recovery_score: score,
        recommended_intensity: Some(TrainingIntensity::Moderate),
        created_at: date,
    }
}

#[tokio::test]
async fn test_user_round_trip_and_lookup() {
    let db = common::create_test_database().await.unwrap();
    let user = test_user("round@example.com", "round_trip");
    db.create_user(&user).await.unwrap();

    let by_id = db.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "round@example.com");
    assert!(by_id.is_active);

    assert!(db.get_user_by_username("round_trip").await.unwrap().is_some());
    assert!(db.get_user_by_login("round_trip").await.unwrap().is_some());
    assert!(db
        .get_user_by_login("ROUND@example.com")
        .await
        .unwrap()
        .is_some());
    assert!(db.get_user_by_login("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_violates_unique_constraint() {
    let db = common::create_test_database().await.unwrap();
    db.create_user(&test_user("dup@example.com", "first"))
        .await
        .unwrap();

    let result = db.create_user(&test_user("dup@example.com", "second")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_deactivate_user() {
    let db = common::create_test_database().await.unwrap();
    let user = test_user("d@example.com", "deactivate");
    db.create_user(&user).await.unwrap();
    db.create_recovery_log(&recovery_log(user.id, 2, Some(6.0)))
        .await
        .unwrap();
    db.upsert_wearable_data(user.id, &wearable("google_fit", 0))
        .await
        .unwrap();
    let session = WorkoutSession {
        id: Uuid::new_v4(),
        user_id: user.id,
        workout_id: None,
        session_date: Utc::now(),
        duration_minutes: Some(20),
        exercises_completed: vec![],
        total_volume: None,
        notes: Some("easy spin".to_owned()),
        created_at: Utc::now(),
    };
    db.create_workout_session(&session, &[]).await.unwrap();

    assert!(db.deactivate_user(user.id).await.unwrap());
    assert!(!db.get_user(user.id).await.unwrap().unwrap().is_active);

    let since = Utc::now() - Duration::days(3650);
    assert_eq!(db.get_recovery_history(user.id, since).await.unwrap().len(), 1);
    assert_eq!(db.get_wearable_history(user.id, since, None).await.unwrap().len(), 1);
    assert!(db
        .get_workout_session(user.id, session.id)
        .await
        .unwrap()
        .is_some());
    assert!(!db.deactivate_user(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_recovery_history_window_and_scores() {
    let db = common::create_test_database().await.unwrap();
    let user = test_user("r@example.com", "recovery");
    db.create_user(&user).await.unwrap();

    db.create_recovery_log(&recovery_log(user.id, 24 * 40, Some(3.0)))
        .await
        .unwrap();
    db.create_recovery_log(&recovery_log(user.id, 48, Some(6.5)))
        .await
        .unwrap();
    db.create_recovery_log(&recovery_log(user.id, 1, None))
        .await
        .unwrap();

    let since = Utc::now() - Duration::days(30);
    let history = db.get_recovery_history(user.id, since).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].date > history[1].date);
    assert_eq!(
        history[1].recommended_intensity,
        Some(TrainingIntensity::Moderate)
    );

    let scores = db.get_recovery_scores(user.id, since).await.unwrap();
    assert_eq!(scores, vec![6.5]);

    let latest = db.get_latest_recovery_log(user.id).await.unwrap().unwrap();
    assert!(latest.recovery_score.is_none());
}

#[tokio::test]
async fn test_wearable_upsert_merges_fields() {
    let db = common::create_test_database().await.unwrap();
    let user = test_user("w@example.com", "wearable");
    db.create_user(&user).await.unwrap();

    let mut first = wearable("apple_health", 0);
    first.steps = Some(9000);
    first.raw_data = Some(json!({ "v": 1 }));
    let stored = db.upsert_wearable_data(user.id, &first).await.unwrap();

    let mut second = wearable("apple_health", 0);
    second.hrv_rmssd = Some(61.5);
    let merged = db.upsert_wearable_data(user.id, &second).await.unwrap();

    assert_eq!(stored.id, merged.id);
    assert_eq!(merged.steps, Some(9000));
    assert_eq!(merged.hrv_rmssd, Some(61.5));
    assert_eq!(merged.raw_data, Some(json!({ "v": 1 })));
    assert!(merged.sync_timestamp >= stored.sync_timestamp);
}

#[tokio::test]
async fn test_wearable_latest_filters_and_delete() {
    let db = common::create_test_database().await.unwrap();
    let user = test_user("w2@example.com", "wearable2");
    db.create_user(&user).await.unwrap();

    db.upsert_wearable_batch(
        user.id,
        &[
            wearable("apple_health", 3),
            wearable("google_fit", 2),
            wearable("apple_health", 1),
        ],
    )
    .await
    .unwrap();

    let latest = db
        .get_latest_wearable_data(user.id, None, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.source, "apple_health");

    let latest_fit = db
        .get_latest_wearable_data(user.id, Some("google_fit"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest_fit.source, "google_fit");

    let cutoff = Utc.with_ymd_and_hms(2026, 1, 20, 6, 0, 0).unwrap();
    assert!(db
        .get_latest_wearable_data(user.id, None, Some(cutoff))
        .await
        .unwrap()
        .is_none());

    let removed = db
        .delete_wearable_data(user.id, None, Some("apple_health"))
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let remaining = db
        .get_wearable_history(user.id, cutoff - Duration::days(10), None)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].source, "google_fit");
}

#[tokio::test]
async fn test_workout_replace_and_delete_detaches_sessions() {
    let db = common::create_test_database().await.unwrap();
    let user = test_user("wk@example.com", "workouts");
    db.create_user(&user).await.unwrap();

    let workout = Workout {
        id: Uuid::new_v4(),
        user_id: user.id,
        name: "Push".to_owned(),
        description: None,
        workout_type: Some("strength".to_owned()),
        is_template: true,
        exercises: vec![json!({ "name": "Bench Press" })],
        created_at: Utc::now(),
        updated_at: None,
    };
    db.create_workout(&workout).await.unwrap();

    let replacement = WorkoutCreate {
        name: "Push v2".to_owned(),
        description: Some("more volume".to_owned()),
        workout_type: None,
        is_template: false,
        exercises: vec![],
    };
    let replaced = db
        .replace_workout(user.id, workout.id, &replacement)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.name, "Push v2");
    assert!(replaced.updated_at.is_some());
    assert!(db
        .replace_workout(Uuid::new_v4(), workout.id, &replacement)
        .await
        .unwrap()
        .is_none());

    let session = WorkoutSession {
        id: Uuid::new_v4(),
        user_id: user.id,
        workout_id: Some(workout.id),
        session_date: Utc::now(),
        duration_minutes: Some(40),
        exercises_completed: vec![json!({ "name": "Bench Press", "weight": 60.0, "reps": 10, "sets": 3 })],
        total_volume: Some(1800.0),
        notes: None,
        created_at: Utc::now(),
    };
    let performance = ExercisePerformance {
        id: Uuid::new_v4(),
        user_id: user.id,
        session_id: session.id,
        exercise_name: "Bench Press".to_owned(),
        exercise_id: None,
        weight_kg: Some(60.0),
        reps: 10,
        sets: 3,
        rpe: Some(8),
        estimated_1rm: Some(80.0),
        suggested_next_weight: Some(60.0),
        created_at: Utc::now(),
    };
    db.create_workout_session(&session, std::slice::from_ref(&performance))
        .await
        .unwrap();

    assert!(db.delete_workout(user.id, workout.id).await.unwrap());
    assert!(!db.delete_workout(user.id, workout.id).await.unwrap());

    let kept = db
        .get_workout_session(user.id, session.id)
        .await
        .unwrap()
        .unwrap();
    assert!(kept.workout_id.is_none());

    let performances = db
        .get_session_performances(user.id, session.id)
        .await
        .unwrap();
    assert_eq!(performances, vec![performance]);

    let weights = db.get_performance_weights(user.id).await.unwrap();
    assert_eq!(weights, vec![("Bench Press".to_owned(), Some(60.0))]);
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("equilibria.db");
    let url = DatabaseUrl::parse_url(&format!("sqlite:{}", path.display())).unwrap();

    let user = test_user("f@example.com", "file_user");
    {
        let db = Database::new(&url).await.unwrap();
        db.create_user(&user).await.unwrap();
        db.ping().await.unwrap();
    }

    let reopened = Database::new(&url).await.unwrap();
    assert!(reopened.get_user(user.id).await.unwrap().is_some());
}
