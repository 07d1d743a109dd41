// ABOUTME: Wearable sync route handlers for Apple Health, Google Fit and BLE devices
// ABOUTME: Upserting single and batch sync, history, latest reading and range clearing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use equilibria_core::constants::{error_messages, limits};
use equilibria_core::errors::{AppError, ErrorCode};
use equilibria_core::models::WearableDataInput;
use serde::Deserialize;
use serde_json::json;

use super::recovery::DaysQuery;
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// `?days=&source=` filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WearableQuery {
    /// Look-back window in days
    #[serde(default)]
    pub days: Option<i64>,
    /// Restrict to one origin tag
    #[serde(default)]
    pub source: Option<String>,
}

impl WearableQuery {
    fn source(&self) -> Option<&str> {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|source| !source.is_empty())
    }
}

/// Wearable routes handler
pub struct WearableRoutes;

impl WearableRoutes {
    /// Create all wearable routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/wearables/sync", post(Self::handle_sync))
            .route("/wearables/sync/batch", post(Self::handle_sync_batch))
            .route("/wearables/history", get(Self::handle_history))
            .route("/wearables/latest", get(Self::handle_latest))
            .route("/wearables/clear", delete(Self::handle_clear))
            .with_state(resources)
    }

    #[tracing::instrument(skip(resources, headers, input), fields(user_id = tracing::field::Empty))]
    async fn handle_sync(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(input): Json<WearableDataInput>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        tracing::Span::current().record("user_id", user.id.to_string());
        input.validate()?;

        let stored = resources
            .database
            .upsert_wearable_data(user.id, &input)
            .await?;

        tracing::info!(
            user_id = %user.id,
            source = %stored.source,
            measurement_date = %stored.measurement_date.to_rfc3339(),
            "Wearable data synced"
        );
        Ok((StatusCode::CREATED, Json(stored)).into_response())
    }

    async fn handle_sync_batch(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(inputs): Json<Vec<WearableDataInput>>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        for (index, input) in inputs.iter().enumerate() {
            input.validate().map_err(|e| {
                AppError::new(e.code, format!("Entry {index}: {}", e.message))
            })?;
        }

        let stored = resources
            .database
            .upsert_wearable_batch(user.id, &inputs)
            .await?;

        AppLogger::log_data_change(
            &user.id.to_string(),
            "wearable_data",
            "sync_batch",
            stored.len() as u64,
        );
        Ok((StatusCode::OK, Json(stored)).into_response())
    }

    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<WearableQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        let days = DaysQuery { days: query.days }.window_days()?;

        let readings = resources
            .database
            .get_wearable_history(user.id, Utc::now() - Duration::days(days), query.source())
            .await?;
        Ok((StatusCode::OK, Json(readings)).into_response())
    }

    async fn handle_latest(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<WearableQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        let reading = resources
            .database
            .get_latest_wearable_data(user.id, query.source(), None)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ResourceNotFound, error_messages::NO_WEARABLE_DATA)
            })?;
        Ok((StatusCode::OK, Json(reading)).into_response())
    }

    async fn handle_clear(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<WearableQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        // Zero or absent clears everything
        let before = match query.days {
            None | Some(0) => None,
            Some(days) if (1..=limits::MAX_HISTORY_DAYS).contains(&days) => {
                Some(Utc::now() - Duration::days(days))
            }
            Some(_) => {
                return Err(AppError::out_of_range("days", 0, limits::MAX_HISTORY_DAYS));
            }
        };

        let count = resources
            .database
            .delete_wearable_data(user.id, before, query.source())
            .await?;

        tracing::info!(
            user_id = %user.id,
            count,
            days = ?query.days,
            source = ?query.source(),
            "Wearable data cleared"
        );
        Ok((
            StatusCode::OK,
            Json(json!({ "message": format!("Cleared {count} wearable data entries") })),
        )
            .into_response())
    }
}
