// ABOUTME: SQLite storage layer for accounts, recovery, wearable and workout data
// ABOUTME: Owns the connection pool, runs schema migrations, and maps rows to domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! All queries are scoped by `user_id`; callers never see another user's rows.
//! Identifiers are stored as TEXT UUIDs and timestamps as RFC 3339 TEXT.

mod performance;
mod recovery;
mod users;
mod wearables;
mod workouts;

use std::path::Path;
use std::str::FromStr;

use equilibria_core::errors::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseUrl;

/// Storage layer result
pub type DbResult<T> = Result<T, DatabaseError>;

/// Database manager
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database and run migrations
    ///
    /// An in-memory database lives on a single pinned connection so every
    /// query sees the same schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = match url {
            DatabaseUrl::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            DatabaseUrl::SQLite { path } => {
                ensure_parent_dir(path)?;
                SqlitePoolOptions::new().max_connections(5)
            }
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run schema migrations; every statement is idempotent
    ///
    /// # Errors
    ///
    /// Returns `MigrationError` naming the failing statement
    pub async fn migrate(&self) -> DbResult<()> {
        self.migrate_users().await?;
        self.migrate_recovery().await?;
        self.migrate_wearables().await?;
        self.migrate_workouts().await?;
        self.migrate_performance().await?;
        Ok(())
    }

    /// Cheap round-trip used by the readiness probe
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Execute one schema statement, tagging failures as migration errors
    async fn run_migration(&self, statement: &str) -> DbResult<()> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                DatabaseError::ConnectionError(format!(
                    "Cannot create database directory {}: {e}",
                    parent.display()
                ))
            }),
        _ => Ok(()),
    }
}

/// Decode a TEXT uuid column
pub(crate) fn parse_uuid(table: &'static str, field: &'static str, value: &str) -> DbResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidData {
        table,
        field,
        value: value.to_owned(),
    })
}

/// Decode a TEXT JSON array column, treating NULL as empty
pub(crate) fn parse_json_array(
    table: &'static str,
    field: &'static str,
    value: Option<&str>,
) -> DbResult<Vec<serde_json::Value>> {
    value.map_or_else(
        || Ok(Vec::new()),
        |raw| {
            serde_json::from_str(raw).map_err(|_| DatabaseError::InvalidData {
                table,
                field,
                value: raw.to_owned(),
            })
        },
    )
}
