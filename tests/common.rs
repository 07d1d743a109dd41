// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory resources, router construction, and user/token helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `equilibria_server`

use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use equilibria_server::{
    config::ServerConfig,
    database::Database,
    models::User,
    resources::ServerResources,
    routes::build_router,
};

static INIT_LOGGER: Once = Once::new();

/// Password used for every helper-created account
pub const TEST_PASSWORD: &str = "testpassword123";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard in-memory database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let config = ServerConfig::for_testing();
    Ok(Database::new(&config.database.url).await?)
}

/// Resources backed by a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    create_test_resources_with(ServerConfig::for_testing()).await
}

/// Resources with a caller-adjusted configuration
pub async fn create_test_resources_with(config: ServerConfig) -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::new(&config.database.url).await?;
    Ok(Arc::new(ServerResources::new(database, Arc::new(config))))
}

/// The full application router, middleware included
pub fn app(resources: &Arc<ServerResources>) -> Router {
    build_router(Arc::clone(resources))
}

/// Insert an active user directly, bypassing the HTTP layer
pub async fn create_test_user(
    resources: &Arc<ServerResources>,
    email: &str,
    username: &str,
) -> Result<User> {
    let hash = resources.auth_manager.hash_password(TEST_PASSWORD).await?;
    let user = User::new(email.to_owned(), username.to_owned(), hash);
    resources.database.create_user(&user).await?;
    Ok(user)
}

/// Insert a user and mint a bearer token for them
pub async fn create_user_with_token(
    resources: &Arc<ServerResources>,
    email: &str,
    username: &str,
) -> Result<(User, String)> {
    let user = create_test_user(resources, email, username).await?;
    let (token, _) = resources.auth_manager.generate_token(&user)?;
    Ok((user, token))
}
