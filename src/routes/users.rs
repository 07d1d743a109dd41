// ABOUTME: Profile route handlers for the authenticated user
// ABOUTME: Profile read/update, password change, and soft account deactivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use equilibria_core::constants::{error_messages, limits};
use equilibria_core::errors::AppError;
use equilibria_core::models::{PasswordChange, UserProfileUpdate, UserResponse};
use serde_json::json;

use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::routes::auth::AuthService;

/// User profile routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/users/profile",
                get(Self::handle_get_profile).put(Self::handle_update_profile),
            )
            .route("/users/change-password", post(Self::handle_change_password))
            .route("/users/account", delete(Self::handle_delete_account))
            .with_state(resources)
    }

    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        Ok((StatusCode::OK, Json(UserResponse::from(&user))).into_response())
    }

    #[tracing::instrument(skip(resources, headers, update), fields(user_id = tracing::field::Empty))]
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(update): Json<UserProfileUpdate>,
    ) -> Result<Response, AppError> {
        let mut user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;
        tracing::Span::current().record("user_id", user.id.to_string());

        if update.height_cm.is_some_and(|h| !h.is_finite() || h <= 0.0) {
            return Err(AppError::invalid_input("height_cm must be a positive number"));
        }
        if update.weight_kg.is_some_and(|w| !w.is_finite() || w <= 0.0) {
            return Err(AppError::invalid_input("weight_kg must be a positive number"));
        }
        if update.age.is_some_and(|age| age < 0) {
            return Err(AppError::invalid_input("age must not be negative"));
        }

        user.apply_profile_update(&update);
        let updated = resources.database.update_user_profile(&user).await?;
        AppLogger::log_data_change(&user.id.to_string(), "users", "update_profile", 1);

        Ok((StatusCode::OK, Json(UserResponse::from(&updated))).into_response())
    }

    async fn handle_change_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(change): Json<PasswordChange>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        let current_ok = resources
            .auth_manager
            .verify_password(&change.current_password, &user.password_hash)
            .await?;
        if !current_ok {
            AppLogger::log_auth_event(
                &user.id.to_string(),
                "change_password",
                false,
                Some("wrong current password"),
            );
            return Err(AppError::invalid_input(error_messages::WRONG_PASSWORD));
        }
        if !AuthService::is_valid_password(&change.new_password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {} characters",
                limits::MIN_PASSWORD_LENGTH
            )));
        }

        let new_hash = resources
            .auth_manager
            .hash_password(&change.new_password)
            .await?;
        resources
            .database
            .update_password_hash(user.id, &new_hash)
            .await?;
        AppLogger::log_auth_event(&user.id.to_string(), "change_password", true, None);

        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Password changed successfully" })),
        )
            .into_response())
    }

    async fn handle_delete_account(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_active_user(&headers)
            .await?;

        resources.database.deactivate_user(user.id).await?;
        tracing::info!(user_id = %user.id, "Account deactivated");

        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Account deactivated successfully" })),
        )
            .into_response())
    }
}
