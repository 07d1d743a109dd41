// ABOUTME: User authentication route handlers for registration, login, and logout
// ABOUTME: Issues bearer tokens and exposes the authenticated user's identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use equilibria_core::constants::{error_messages, limits};
use equilibria_core::errors::{AppError, ErrorCode};
use equilibria_core::models::{User, UserResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Login handle, 3-50 characters
    pub username: String,
    /// At least 8 characters
    pub password: String,
}

/// Form-encoded login; `username` may also be the account email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    /// Username or email
    pub username: String,
    /// Plain password
    pub password: String,
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed JWT
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Input validation for account credentials
pub struct AuthService;

impl AuthService {
    /// Minimal structural email check: `local@domain.tld`
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.contains('@')
            && !email.chars().any(char::is_whitespace)
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
    }

    /// Username length within bounds
    #[must_use]
    pub fn is_valid_username(username: &str) -> bool {
        (limits::MIN_USERNAME_LENGTH..=limits::MAX_USERNAME_LENGTH)
            .contains(&username.chars().count())
    }

    /// Password meets the minimum length
    #[must_use]
    pub fn is_valid_password(password: &str) -> bool {
        password.chars().count() >= limits::MIN_PASSWORD_LENGTH
    }

    fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
        if !Self::is_valid_email(request.email.trim()) {
            return Err(AppError::new(ErrorCode::InvalidFormat, "Invalid email format"));
        }
        if !Self::is_valid_username(request.username.trim()) {
            return Err(AppError::invalid_input(format!(
                "Username must be between {} and {} characters",
                limits::MIN_USERNAME_LENGTH,
                limits::MAX_USERNAME_LENGTH
            )));
        }
        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {} characters",
                limits::MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::handle_register))
            .route("/auth/login", post(Self::handle_login))
            .route("/auth/logout", post(Self::handle_logout))
            .route("/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    #[tracing::instrument(skip(resources, request), fields(user_id = tracing::field::Empty))]
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        AuthService::validate_registration(&request)?;

        let email = request.email.trim().to_lowercase();
        let username = request.username.trim().to_owned();

        if resources.database.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::invalid_input(error_messages::EMAIL_TAKEN));
        }
        if resources
            .database
            .get_user_by_username(&username)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_input(error_messages::USERNAME_TAKEN));
        }

        let password_hash = resources.auth_manager.hash_password(&request.password).await?;
        let user = User::new(email, username, password_hash);
        resources.database.create_user(&user).await?;

        tracing::Span::current().record("user_id", user.id.to_string());
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok((StatusCode::CREATED, Json(UserResponse::from(&user))).into_response())
    }

    #[tracing::instrument(skip(resources, form))]
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Form(form): Form<LoginForm>,
    ) -> Result<Response, AppError> {
        let identifier = form.username.trim();
        let user = resources.database.get_user_by_login(identifier).await?;

        let verified = match &user {
            Some(user) => {
                resources
                    .auth_manager
                    .verify_password(&form.password, &user.password_hash)
                    .await?
            }
            None => false,
        };

        let Some(user) = user.filter(|_| verified) else {
            tracing::warn!(username = %identifier, "Failed login attempt");
            return Err(AppError::auth_invalid(error_messages::BAD_CREDENTIALS));
        };

        if !user.is_active {
            AppLogger::log_auth_event(&user.id.to_string(), "login", false, Some("inactive"));
            return Err(AppError::new(
                ErrorCode::AccountInactive,
                "Account is inactive",
            ));
        }

        let (access_token, expires_at) = resources.auth_manager.generate_token(&user)?;
        AppLogger::log_auth_event(&user.id.to_string(), "login", true, None);

        let response = LoginResponse {
            access_token,
            token_type: "bearer".to_owned(),
            expires_at,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_headers(&headers)
            .await?;
        AppLogger::log_auth_event(&user.id.to_string(), "logout", true, None);

        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Successfully logged out" })),
        )
            .into_response())
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth_middleware
            .authenticate_headers(&headers)
            .await?;
        Ok((StatusCode::OK, Json(UserResponse::from(&user))).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(AuthService::is_valid_email("athlete@example.com"));
        assert!(AuthService::is_valid_email("a.b+c@sub.example.org"));
        assert!(!AuthService::is_valid_email("athlete.example.com"));
        assert!(!AuthService::is_valid_email("@example.com"));
        assert!(!AuthService::is_valid_email("athlete@example"));
        assert!(!AuthService::is_valid_email("athlete@.com"));
        assert!(!AuthService::is_valid_email("ath lete@example.com"));
        assert!(!AuthService::is_valid_email("a@b@example.com"));
    }

    #[test]
    fn test_username_and_password_bounds() {
        assert!(!AuthService::is_valid_username("ab"));
        assert!(AuthService::is_valid_username("abc"));
        assert!(AuthService::is_valid_username(&"x".repeat(50)));
        assert!(!AuthService::is_valid_username(&"x".repeat(51)));

        assert!(!AuthService::is_valid_password("short"));
        assert!(AuthService::is_valid_password("longenough"));
    }
}
