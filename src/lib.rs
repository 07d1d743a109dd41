// ABOUTME: Main library entry point for the Equilibria recovery tracking API
// ABOUTME: Wires configuration, storage, authentication and HTTP routes together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Equilibria Server
//!
//! REST backend for a recovery-focused fitness tracker. Users log daily
//! subjective check-ins, sync wearable readings and record workout sessions;
//! the server turns those into a recovery score and a training intensity
//! recommendation.
//!
//! ## Architecture
//!
//! - **config**: environment-driven server configuration
//! - **database**: `SQLite` storage through `sqlx`
//! - **auth**: bcrypt password hashing and HS256 bearer tokens
//! - **routes**: `axum` handlers grouped by domain under `/api/v1`
//! - **`equilibria_intelligence`**: pure scoring and training arithmetic
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use equilibria_server::config::ServerConfig;
//! use equilibria_server::database::Database;
//! use equilibria_server::resources::ServerResources;
//! use equilibria_server::routes::build_router;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(ServerConfig::from_env()?);
//!     let database = Database::new(&config.database.url).await?;
//!     let app = build_router(Arc::new(ServerResources::new(database, config)));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

/// Bearer token issuance, validation and password hashing
pub mod auth;

/// Configuration management
pub mod config;

/// `SQLite` persistence for users, recovery, wearables and workouts
pub mod database;

/// Structured logging setup
pub mod logging;

/// HTTP middleware: authentication, CORS and request tracing
pub mod middleware;

/// Shared state handed to the route handlers
pub mod resources;

/// HTTP route groups
pub mod routes;

pub use equilibria_core::{constants, errors, models};
