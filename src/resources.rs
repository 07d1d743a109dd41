// ABOUTME: Shared resource container handed to every route group as axum state
// ABOUTME: Builds the database-backed auth middleware once from the server config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Centralized dependency injection for the route handlers.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::AuthMiddleware;

/// Resources shared by every request
#[derive(Clone)]
pub struct ServerResources {
    /// Storage layer
    pub database: Arc<Database>,
    /// Token and password handling
    pub auth_manager: Arc<AuthManager>,
    /// Bearer authentication
    pub auth_middleware: Arc<AuthMiddleware>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Wire the shared resources together
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(AuthManager::new(&config.auth));
        let auth_middleware = Arc::new(AuthMiddleware::new(
            Arc::clone(&auth_manager),
            Arc::clone(&database),
        ));

        Self {
            database,
            auth_manager,
            auth_middleware,
            config,
        }
    }
}
