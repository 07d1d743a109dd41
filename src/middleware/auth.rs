// ABOUTME: Bearer-token authentication for the REST API
// ABOUTME: Resolves the Authorization header to a stored user and enforces the active flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use equilibria_core::errors::{AppError, AppResult};
use equilibria_core::models::User;

use super::tracing::RequestContext;
use crate::auth::AuthManager;
use crate::database::Database;

/// Middleware resolving bearer tokens to users
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
    database: Arc<Database>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>, database: Arc<Database>) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate from the `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns 401 errors for a missing header, a non-bearer scheme, an
    /// invalid or expired token, or a token whose user no longer exists
    #[tracing::instrument(
        skip(self, auth_header),
        fields(
            user_id = tracing::field::Empty,
            success = tracing::field::Empty,
        )
    )]
    pub async fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<User> {
        let Some(header) = auth_header else {
            tracing::Span::current().record("success", false);
            tracing::debug!("Authentication failed: missing authorization header");
            return Err(AppError::auth_required());
        };

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                tracing::Span::current().record("success", false);
                AppError::auth_invalid(
                    "Invalid authorization header format - must be 'Bearer <token>'",
                )
            })?;

        let claims = self.auth_manager.validate_token(token).map_err(|e| {
            tracing::Span::current().record("success", false);
            tracing::warn!("JWT authentication failed: {}", e);
            AppError::from(e)
        })?;
        let user_id = claims.user_id()?;

        let user = self.database.get_user(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Token refers to an unknown user");
            AppError::auth_invalid("Could not validate credentials")
        })?;

        tracing::Span::current()
            .record("user_id", user_id.to_string())
            .record("success", true);
        Ok(user)
    }

    /// Authenticate from request headers
    ///
    /// # Errors
    ///
    /// See [`Self::authenticate_request`]
    pub async fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<User> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let user = self.authenticate_request(auth_header).await?;

        RequestContext::from_headers(headers)
            .with_user(user.id)
            .record_in_span();
        Ok(user)
    }

    /// Authenticate and require an active account
    ///
    /// # Errors
    ///
    /// Returns the authentication error, or 403 `AccountInactive` for a
    /// deactivated account
    pub async fn authenticate_active_user(&self, headers: &HeaderMap) -> AppResult<User> {
        let user = self.authenticate_headers(headers).await?;
        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Rejected request from inactive account");
            return Err(AppError::account_inactive());
        }
        Ok(user)
    }

    /// Access the token manager
    #[must_use]
    pub fn auth_manager(&self) -> &AuthManager {
        &self.auth_manager
    }
}
