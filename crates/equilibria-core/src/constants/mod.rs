// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for the Equilibria API (limits, defaults, scoring thresholds)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain.

/// Service identity used in logs, health responses and token audiences
pub mod service_names {
    /// Public service name
    pub const EQUILIBRIA_API: &str = "equilibria-api";
    /// Server binary name used in startup logs
    pub const EQUILIBRIA_SERVER: &str = "equilibria-server";
    /// JWT audience
    pub const TOKEN_AUDIENCE: &str = "equilibria-api";
}

/// API endpoints
pub mod endpoints {
    /// Versioned API prefix
    pub const API_V1: &str = "/api/v1";
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Readiness endpoint
    pub const READY_CHECK: &str = "/ready";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
}

/// Request validation and paging limits
pub mod limits {
    /// Lowest value on the subjective 1-10 scales
    pub const SUBJECTIVE_SCALE_MIN: i64 = 1;
    /// Highest value on the subjective 1-10 scales
    pub const SUBJECTIVE_SCALE_MAX: i64 = 10;
    /// Hours in a day, the upper bound for reported sleep
    pub const MAX_SLEEP_HOURS: f64 = 24.0;
    /// Default look-back window for history and stats queries
    pub const DEFAULT_HISTORY_DAYS: i64 = 30;
    /// Longest accepted look-back window
    pub const MAX_HISTORY_DAYS: i64 = 3650;
    /// Default number of sessions returned by the session list
    pub const DEFAULT_SESSION_LIMIT: i64 = 50;
    /// Largest page of sessions
    pub const MAX_SESSION_LIMIT: i64 = 500;
    /// Window in which a wearable reading counts as "current" for a recovery log
    pub const WEARABLE_LOOKBACK_HOURS: i64 = 24;
    /// Minimum password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Username length bounds
    pub const MIN_USERNAME_LENGTH: usize = 3;
    /// Username length bounds
    pub const MAX_USERNAME_LENGTH: usize = 50;
    /// Maximum accepted request body
    pub const MAX_REQUEST_SIZE: usize = 1_048_576; // 1MB
    /// Token lifetime in minutes (one day)
    pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 1440;
    /// Longest accepted token lifetime in minutes (one year)
    pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 525_600;
    /// Cheapest bcrypt work factor the `bcrypt` crate accepts
    pub const MIN_BCRYPT_COST: u32 = 4;
    /// Most expensive bcrypt work factor the `bcrypt` crate accepts
    pub const MAX_BCRYPT_COST: u32 = 31;
    /// Refresh token lifetime in days (declared, no refresh endpoint)
    pub const DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS: i64 = 30;
}

/// Default configuration values
pub mod defaults {
    /// Default `SQLite` database location
    pub const DATABASE_URL: &str = "sqlite:./data/equilibria.db";
    /// Default bind address
    pub const HOST: &str = "0.0.0.0";
    /// Placeholder signing secret; rejected in production
    pub const DEV_SECRET_KEY: &str = "your-secret-key-change-in-production";
    /// Only supported signing algorithm
    pub const JWT_ALGORITHM: &str = "HS256";
    /// Frontend origins allowed by default
    pub const CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:8081,http://localhost:19006";
    /// Task broker URL (declared only)
    pub const REDIS_URL: &str = "redis://redis:6379/0";
    /// Demo account created by the seeding binary
    pub const DEMO_EMAIL: &str = "demo@equilibria.app";
    /// Demo account username
    pub const DEMO_USERNAME: &str = "demo";
    /// Demo account password
    pub const DEMO_PASSWORD: &str = "demopassword";
}

/// Recovery scoring constants
pub mod recovery {
    /// Value assumed for a subjective input that was not reported
    pub const DEFAULT_SUBJECTIVE_VALUE: f64 = 5.0;
    /// Lower bound of the recovery score
    pub const MIN_SCORE: f64 = 1.0;
    /// Upper bound of the recovery score
    pub const MAX_SCORE: f64 = 10.0;
    /// Inverted scales use `11 - value` so that 1 maps to 10
    pub const INVERSION_BASE: f64 = 11.0;

    /// Weighted algorithm: sleep quality weight
    pub const SLEEP_QUALITY_WEIGHT: f64 = 0.30;
    /// Weighted algorithm: inverted soreness weight
    pub const SORENESS_WEIGHT: f64 = 0.25;
    /// Weighted algorithm: energy weight
    pub const ENERGY_WEIGHT: f64 = 0.20;
    /// Weighted algorithm: inverted stress weight
    pub const STRESS_WEIGHT: f64 = 0.15;

    /// Legacy algorithm: sleep quality weight
    pub const LEGACY_SLEEP_WEIGHT: f64 = 0.4;
    /// Legacy algorithm: inverted soreness weight
    pub const LEGACY_SORENESS_WEIGHT: f64 = 0.3;
    /// Legacy algorithm: energy weight
    pub const LEGACY_ENERGY_WEIGHT: f64 = 0.3;
    /// Legacy algorithm: HRV divisor
    pub const LEGACY_HRV_DIVISOR: f64 = 50.0;
    /// Legacy algorithm: cap on the HRV bonus
    pub const LEGACY_HRV_BONUS_CAP: f64 = 2.0;

    /// Scores at or above this recommend heavy training
    pub const HEAVY_THRESHOLD: f64 = 8.0;
    /// Scores at or above this (and below heavy) recommend moderate training
    pub const MODERATE_THRESHOLD: f64 = 5.0;
}

/// Training arithmetic constants
pub mod training {
    /// Divisor in the Epley one-rep-max estimate
    pub const EPLEY_REPS_DIVISOR: f64 = 30.0;
    /// Load added when the last session felt easy
    pub const PROGRESSION_INCREMENT_KG: f64 = 2.5;
    /// Fraction kept when the last session was near failure
    pub const DELOAD_FACTOR: f64 = 0.95;
    /// RPE at or below which load is increased
    pub const EASY_RPE_MAX: i64 = 7;
    /// RPE at or above which load is reduced
    pub const HARD_RPE_MIN: i64 = 9;
}

/// User-facing error messages shared across handlers
pub mod error_messages {
    /// Duplicate email on registration
    pub const EMAIL_TAKEN: &str = "Email already registered";
    /// Duplicate username on registration
    pub const USERNAME_TAKEN: &str = "Username already taken";
    /// Bad login
    pub const BAD_CREDENTIALS: &str = "Incorrect username or password";
    /// Wrong current password on change
    pub const WRONG_PASSWORD: &str = "Incorrect password";
    /// Recovery latest with no rows
    pub const NO_RECOVERY_DATA: &str = "No recovery data found";
    /// Wearable latest with no rows
    pub const NO_WEARABLE_DATA: &str = "No wearable data found";
}
