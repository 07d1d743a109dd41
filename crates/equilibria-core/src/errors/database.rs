// ABOUTME: Database error type shared by the storage layer and route handlers
// ABOUTME: Wraps sqlx failures and row decoding problems, converting into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A query failed to execute
    #[error("Database query failed: {context}")]
    QueryError {
        /// What was being attempted and the driver's message
        context: String,
    },

    /// A stored value could not be decoded into its domain type
    #[error("Invalid {field} value in {table}: {value}")]
    InvalidData {
        /// Table the row came from
        table: &'static str,
        /// Column holding the bad value
        field: &'static str,
        /// The offending value
        value: String,
    },

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationError(String),

    /// Connection could not be established
    #[error("Database connection failed: {0}")]
    ConnectionError(String),
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        Self::QueryError {
            context: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidData {
            table: "json",
            field: "payload",
            value: error.to_string(),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        Self::new(ErrorCode::DatabaseError, error.to_string()).with_source(error)
    }
}
