// ABOUTME: Recovery check-in route handlers
// ABOUTME: Scores new check-ins against recent wearable data and serves history and stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use equilibria_core::constants::{error_messages, limits};
use equilibria_core::errors::{AppError, AppResult, ErrorCode};
use equilibria_core::models::{RecoveryLog, RecoveryLogRequest, RecoveryStats, WearableData};
use equilibria_intelligence::{
    recommend_intensity, summarize_scores, RecoveryInputs, WearableSignals,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::resources::ServerResources;

/// `?days=` look-back window
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DaysQuery {
    /// Days to look back, default 30
    #[serde(default)]
    pub days: Option<i64>,
}

impl DaysQuery {
    /// Requested window, defaulted and bounds-checked
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` outside 1 to the maximum history window
    pub fn window_days(self) -> AppResult<i64> {
        let days = self.days.unwrap_or(limits::DEFAULT_HISTORY_DAYS);
        if !(1..=limits::MAX_HISTORY_DAYS).contains(&days) {
            return Err(AppError::out_of_range("days", 1, limits::MAX_HISTORY_DAYS));
        }
        Ok(days)
    }
}

/// Recovery routes handler
pub struct RecoveryRoutes;

impl RecoveryRoutes {
    /// Create all recovery routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/recovery/log", post(Self::handle_log))
            .route("/recovery/history", get(Self::handle_history))
            .route("/recovery/latest", get(Self::handle_latest))
            .route("/recovery/stats", get(Self::handle_stats))
            .with_state(resources)
    }

    #[tracing::instrument(
        skip(resources, headers, request),
        fields(user_id = tracing::field::Empty, recovery_score = tracing::field::Empty)
    )]
    async fn handle_log(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<RecoveryLogRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        tracing::Span::current().record("user_id", user.id.to_string());
        request.validate()?;

        let now = Utc::now();
        let since = now - Duration::hours(limits::WEARABLE_LOOKBACK_HOURS);
        let wearable = resources
            .database
            .get_latest_wearable_data(user.id, None, Some(since))
            .await?;

        let signals = Self::wearable_signals(wearable.as_ref(), &request);
        let algorithm = resources.config.recovery.scoring_algorithm;
        let score = algorithm.score(&RecoveryInputs::from(&request), &signals);
        let intensity = recommend_intensity(score);

        let log = RecoveryLog {
            id: Uuid::new_v4(),
            user_id: user.id,
            date: now,
            sleep_hours: request.sleep_hours,
            sleep_quality: request.sleep_quality,
            soreness_level: request.soreness_level,
            energy_level: request.energy_level,
            stress_level: request.stress_level,
            recovery_score: Some(score),
            recommended_intensity: Some(intensity),
            created_at: now,
        };
        resources.database.create_recovery_log(&log).await?;

        tracing::Span::current().record("recovery_score", score);
        tracing::info!(
            user_id = %user.id,
            recovery_score = score,
            recommendation = %intensity,
            algorithm = %algorithm,
            used_wearable = wearable.is_some(),
            "Recovery logged"
        );

        Ok((StatusCode::CREATED, Json(log)).into_response())
    }

    /// Wearable readings win; request-supplied HRV and resting HR fill the gaps
    fn wearable_signals(
        wearable: Option<&WearableData>,
        request: &RecoveryLogRequest,
    ) -> WearableSignals {
        WearableSignals {
            hrv_rmssd: wearable
                .and_then(|w| w.hrv_rmssd)
                .or(request.hrv_rmssd),
            resting_heart_rate: wearable
                .and_then(|w| w.resting_heart_rate)
                .map(|bpm| bpm as f64)
                .or(request.resting_heart_rate),
            sleep_hours: wearable.and_then(WearableData::sleep_hours),
        }
    }

    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<DaysQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let days = query.window_days()?;

        let logs = resources
            .database
            .get_recovery_history(user.id, Utc::now() - Duration::days(days))
            .await?;
        Ok((StatusCode::OK, Json(logs)).into_response())
    }

    async fn handle_latest(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        let log = resources
            .database
            .get_latest_recovery_log(user.id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ResourceNotFound, error_messages::NO_RECOVERY_DATA)
            })?;
        Ok((StatusCode::OK, Json(log)).into_response())
    }

    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<DaysQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let days = query.window_days()?;

        let scores = resources
            .database
            .get_recovery_scores(user.id, Utc::now() - Duration::days(days))
            .await?;

        let stats = summarize_scores(&scores).map_or(
            RecoveryStats {
                average_score: None,
                highest_score: None,
                lowest_score: None,
                total_logs: 0,
                days_requested: days,
            },
            |summary| RecoveryStats {
                average_score: Some(summary.average),
                highest_score: Some(summary.highest),
                lowest_score: Some(summary.lowest),
                total_logs: summary.count,
                days_requested: days,
            },
        );
        Ok((StatusCode::OK, Json(stats)).into_response())
    }
}
