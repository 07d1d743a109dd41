// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use equilibria_core::constants::{defaults, limits, ports};
use equilibria_intelligence::RecoveryScoringAlgorithm;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Default
    #[default]
    Info,
    /// Verbose
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for non-`SQLite` URLs or an empty path
    pub fn parse_url(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            return Err(anyhow!("Only SQLite databases are supported, got: {s}"));
        }

        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:")).unwrap_or(s);
        let path_str = path_str.split('?').next().unwrap_or(path_str);

        match path_str {
            ":memory:" => Ok(Self::Memory),
            "" => Err(anyhow!("DATABASE_URL has an empty path")),
            path => Ok(Self::SQLite {
                path: PathBuf::from(path),
            }),
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/equilibria.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token and password settings
    pub auth: AuthConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
    /// Recovery scoring settings
    pub recovery: RecoveryConfig,
    /// Declared integrations with no runtime consumer
    pub external_services: ExternalServicesConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing secret
    pub secret_key: String,
    /// Signing algorithm name; only HS256 is accepted
    pub algorithm: String,
    /// Access token lifetime
    pub access_token_expire_minutes: i64,
    /// Declared refresh token lifetime
    pub refresh_token_expire_days: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("refresh_token_expire_days", &self.refresh_token_expire_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` allows any
    pub allowed_origins: Vec<String>,
}

/// Recovery scoring configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct RecoveryConfig {
    /// Formula used for new check-ins
    pub scoring_algorithm: RecoveryScoringAlgorithm,
}

/// Settings for integrations that are configured but not consumed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalServicesConfig {
    /// Cache/broker URL
    pub redis_url: String,
    /// Task broker URL
    pub celery_broker_url: String,
    /// Task result backend URL
    pub celery_result_backend: String,
    /// Apple Health key
    pub apple_health_key: Option<String>,
    /// Google Fit OAuth client id
    pub google_fit_client_id: Option<String>,
    /// Google Fit OAuth client secret
    #[serde(skip_serializing)]
    pub google_fit_client_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables, reading `.env` first if present
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but unparsable
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &ports::DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            host: env_var_or("HOST", defaults::HOST),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info")),

            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", defaults::DATABASE_URL))
                    .context("Invalid DATABASE_URL value")?,
            },

            auth: AuthConfig {
                secret_key: env_var_or("SECRET_KEY", defaults::DEV_SECRET_KEY),
                algorithm: env_var_or("ALGORITHM", defaults::JWT_ALGORITHM),
                access_token_expire_minutes: env_var_or(
                    "ACCESS_TOKEN_EXPIRE_MINUTES",
                    &limits::DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES.to_string(),
                )
                .parse()
                .context("Invalid ACCESS_TOKEN_EXPIRE_MINUTES value")?,
                refresh_token_expire_days: env_var_or(
                    "REFRESH_TOKEN_EXPIRE_DAYS",
                    &limits::DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS.to_string(),
                )
                .parse()
                .context("Invalid REFRESH_TOKEN_EXPIRE_DAYS value")?,
                bcrypt_cost: env_var_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
                    .parse()
                    .context("Invalid BCRYPT_COST value")?,
            },

            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ORIGINS", defaults::CORS_ORIGINS)),
            },

            recovery: RecoveryConfig {
                scoring_algorithm: env_var_or("RECOVERY_SCORING_ALGORITHM", "weighted")
                    .parse()
                    .map_err(|e| anyhow!("Invalid RECOVERY_SCORING_ALGORITHM value: {e}"))?,
            },

            external_services: ExternalServicesConfig {
                redis_url: env_var_or("REDIS_URL", defaults::REDIS_URL),
                celery_broker_url: env_var_or("CELERY_BROKER_URL", defaults::REDIS_URL),
                celery_result_backend: env_var_or("CELERY_RESULT_BACKEND", defaults::REDIS_URL),
                apple_health_key: non_empty_var("APPLE_HEALTH_KEY"),
                google_fit_client_id: non_empty_var("GOOGLE_FIT_CLIENT_ID"),
                google_fit_client_secret: non_empty_var("GOOGLE_FIT_CLIENT_SECRET"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration for tests: in-memory database, cheap hashing, fixed secret
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            http_port: ports::DEFAULT_HTTP_PORT,
            host: "127.0.0.1".to_owned(),
            environment: Environment::Testing,
            log_level: LogLevel::Warn,
            database: DatabaseConfig {
                url: DatabaseUrl::Memory,
            },
            auth: AuthConfig {
                secret_key: "test-secret-key-for-equilibria".to_owned(),
                algorithm: defaults::JWT_ALGORITHM.to_owned(),
                access_token_expire_minutes: limits::DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
                refresh_token_expire_days: limits::DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS,
                bcrypt_cost: limits::MIN_BCRYPT_COST,
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_owned()],
            },
            recovery: RecoveryConfig::default(),
            external_services: ExternalServicesConfig {
                redis_url: defaults::REDIS_URL.to_owned(),
                celery_broker_url: defaults::REDIS_URL.to_owned(),
                celery_result_backend: defaults::REDIS_URL.to_owned(),
                apple_health_key: None,
                google_fit_client_id: None,
                google_fit_client_secret: None,
            },
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported algorithm, a token lifetime outside
    /// one minute to one year, a bcrypt cost outside 4-31, or the placeholder secret in production
    pub fn validate(&self) -> Result<()> {
        if !self.auth.algorithm.eq_ignore_ascii_case(defaults::JWT_ALGORITHM) {
            return Err(anyhow!(
                "Unsupported ALGORITHM '{}': only HS256 is supported",
                self.auth.algorithm
            ));
        }

        if !(1..=limits::MAX_ACCESS_TOKEN_EXPIRE_MINUTES)
            .contains(&self.auth.access_token_expire_minutes)
        {
            return Err(anyhow!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {}",
                limits::MAX_ACCESS_TOKEN_EXPIRE_MINUTES
            ));
        }

        if !(limits::MIN_BCRYPT_COST..=limits::MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow!(
                "BCRYPT_COST must be between {} and {}",
                limits::MIN_BCRYPT_COST,
                limits::MAX_BCRYPT_COST
            ));
        }

        if self.auth.secret_key.is_empty() {
            return Err(anyhow!("SECRET_KEY must not be empty"));
        }

        if self.auth.secret_key == defaults::DEV_SECRET_KEY {
            if self.environment.is_production() {
                return Err(anyhow!("SECRET_KEY must be set in production"));
            }
            warn!("Using the development SECRET_KEY; set SECRET_KEY before deploying");
        }

        if self.database.url.is_memory() && self.environment.is_production() {
            warn!("In-memory database configured in production; data will not persist");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Equilibria API Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Token Lifetime: {} minutes\n\
             - CORS Origins: {}\n\
             - Recovery Scoring: {}\n\
             - Task Broker: {}",
            self.host,
            self.http_port,
            self.environment,
            self.log_level,
            if self.database.url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.auth.access_token_expire_minutes,
            self.cors.allowed_origins.join(", "),
            self.recovery.scoring_algorithm,
            if self.external_services.celery_broker_url.is_empty() {
                "Disabled"
            } else {
                "Configured (unused)"
            },
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
