// ABOUTME: Workout plan and session route handlers
// ABOUTME: Plan CRUD, session logging with derived volume and performances, best lifts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use equilibria_core::constants::limits;
use equilibria_core::errors::AppError;
use equilibria_core::models::{
    ExercisePerformance, Workout, WorkoutCreate, WorkoutSession, WorkoutSessionCreate,
};
use equilibria_intelligence::{best_lifts, extract_performances, total_volume};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// `?templates_only=` filter
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListWorkoutsQuery {
    /// Only return templates
    #[serde(default)]
    pub templates_only: bool,
}

/// `?limit=` for session listing
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SessionsQuery {
    /// Maximum sessions returned, clamped to 1-500
    #[serde(default)]
    pub limit: Option<i64>,
}

impl SessionsQuery {
    /// Requested limit, defaulted and clamped
    #[must_use]
    pub fn effective_limit(self) -> i64 {
        self.limit
            .unwrap_or(limits::DEFAULT_SESSION_LIMIT)
            .clamp(1, limits::MAX_SESSION_LIMIT)
    }
}

fn workout_not_found() -> AppError {
    AppError::not_found("Workout")
}

fn session_not_found() -> AppError {
    AppError::not_found("Workout session")
}

/// Unparsable ids cannot match any row
fn parse_id(raw: &str, not_found: fn() -> AppError) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/workouts",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/workouts/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/workouts/sessions",
                get(Self::handle_list_sessions).post(Self::handle_log_session),
            )
            .route("/workouts/sessions/:id", get(Self::handle_get_session))
            .route(
                "/workouts/sessions/:id/performance",
                get(Self::handle_session_performance),
            )
            .route("/workouts/progress/best-lifts", get(Self::handle_best_lifts))
            .route(
                "/workouts/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    #[tracing::instrument(
        skip(resources, headers, request),
        fields(user_id = tracing::field::Empty, workout_id = tracing::field::Empty)
    )]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<WorkoutCreate>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        request.validate()?;

        let workout = Workout {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: request.name.trim().to_owned(),
            description: request.description,
            workout_type: request.workout_type,
            is_template: request.is_template,
            exercises: request.exercises,
            created_at: Utc::now(),
            updated_at: None,
        };
        resources.database.create_workout(&workout).await?;

        tracing::Span::current()
            .record("user_id", user.id.to_string())
            .record("workout_id", workout.id.to_string());
        tracing::info!(user_id = %user.id, workout_id = %workout.id, "Workout created");

        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListWorkoutsQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        let workouts = resources
            .database
            .list_workouts(user.id, query.templates_only)
            .await?;
        Ok((StatusCode::OK, Json(workouts)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let workout_id = parse_id(&id, workout_not_found)?;

        let workout = resources
            .database
            .get_workout(user.id, workout_id)
            .await?
            .ok_or_else(workout_not_found)?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<WorkoutCreate>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let workout_id = parse_id(&id, workout_not_found)?;
        request.validate()?;

        let workout = resources
            .database
            .replace_workout(user.id, workout_id, &request)
            .await?
            .ok_or_else(workout_not_found)?;

        AppLogger::log_data_change(&user.id.to_string(), "workouts", "replace", 1);
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let workout_id = parse_id(&id, workout_not_found)?;

        if !resources
            .database
            .delete_workout(user.id, workout_id)
            .await?
        {
            return Err(workout_not_found());
        }

        tracing::info!(user_id = %user.id, workout_id = %workout_id, "Workout deleted");
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Workout deleted successfully" })),
        )
            .into_response())
    }

    #[tracing::instrument(
        skip(resources, headers, request),
        fields(user_id = tracing::field::Empty, session_id = tracing::field::Empty)
    )]
    async fn handle_log_session(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<WorkoutSessionCreate>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        request.validate()?;

        if let Some(workout_id) = request.workout_id {
            resources
                .database
                .get_workout(user.id, workout_id)
                .await?
                .ok_or_else(workout_not_found)?;
        }

        let now = Utc::now();
        let session = WorkoutSession {
            id: Uuid::new_v4(),
            user_id: user.id,
            workout_id: request.workout_id,
            session_date: now,
            duration_minutes: request.duration_minutes,
            total_volume: total_volume(&request.exercises_completed),
            exercises_completed: request.exercises_completed,
            notes: request.notes,
            created_at: now,
        };

        let performances: Vec<ExercisePerformance> =
            extract_performances(&session.exercises_completed)
                .into_iter()
                .map(|entry| ExercisePerformance {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    session_id: session.id,
                    exercise_name: entry.exercise_name,
                    exercise_id: entry.exercise_id,
                    weight_kg: entry.weight_kg,
                    reps: entry.reps,
                    sets: entry.sets,
                    rpe: entry.rpe,
                    estimated_1rm: entry.estimated_1rm,
                    suggested_next_weight: entry.suggested_next_weight,
                    created_at: now,
                })
                .collect();

        resources
            .database
            .create_workout_session(&session, &performances)
            .await?;

        tracing::Span::current()
            .record("user_id", user.id.to_string())
            .record("session_id", session.id.to_string());
        tracing::info!(
            user_id = %user.id,
            session_id = %session.id,
            workout_id = ?session.workout_id,
            total_volume = ?session.total_volume,
            performances = performances.len(),
            "Workout session logged"
        );

        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    async fn handle_list_sessions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SessionsQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        let sessions = resources
            .database
            .list_workout_sessions(user.id, query.effective_limit())
            .await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    async fn handle_get_session(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let session_id = parse_id(&id, session_not_found)?;

        let session = resources
            .database
            .get_workout_session(user.id, session_id)
            .await?
            .ok_or_else(session_not_found)?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    async fn handle_session_performance(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let session_id = parse_id(&id, session_not_found)?;

        resources
            .database
            .get_workout_session(user.id, session_id)
            .await?
            .ok_or_else(session_not_found)?;

        let performances = resources
            .database
            .get_session_performances(user.id, session_id)
            .await?;
        Ok((StatusCode::OK, Json(performances)).into_response())
    }

    async fn handle_best_lifts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        let weights = resources.database.get_performance_weights(user.id).await?;
        let bests = best_lifts(
            weights
                .iter()
                .map(|(name, weight)| (name.as_str(), *weight)),
        );
        Ok((StatusCode::OK, Json(bests)).into_response())
    }
}
