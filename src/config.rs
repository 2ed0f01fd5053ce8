// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::str::FromStr;

/// Minimum signing secret length accepted for HS256.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest session token lifetime accepted (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Deployment environment. Production hides internal error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" | "test" | "" => Ok(Self::Development),
            _ => Err(ConfigError::Invalid("APP_ENV", s.to_string())),
        }
    }
}

/// Which document store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Firestore,
    Memory,
}

impl FromStr for DatabaseBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("DATABASE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,

    /// HS256 signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session token lifetime
    pub token_ttl: chrono::Duration,

    /// Persistence backend
    pub database_backend: DatabaseBackend,
    /// GCP project holding the Firestore database
    pub gcp_project_id: String,
    /// Connection attempts before startup gives up
    pub db_connect_attempts: u32,

    /// Attach the admin guard to station deletion
    pub admin_only_delete: bool,
    /// Reject connector types outside the known list
    pub strict_connector_types: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 3002,
            environment: Environment::Development,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            token_ttl: chrono::Duration::hours(24),
            database_backend: DatabaseBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            db_connect_attempts: 1,
            admin_only_delete: false,
            strict_connector_types: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SECRET")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
            .into_bytes();
        if jwt_signing_key.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid(
                "JWT_SECRET",
                format!("must be at least {} bytes", MIN_JWT_SECRET_LEN),
            ));
        }

        let token_ttl = token_ttl_from_hours(parse_var("JWT_EXPIRES_IN_HOURS", 24)?)?;

        Ok(Self {
            port: parse_var("PORT", 3002)?,
            environment: env::var("APP_ENV")
                .unwrap_or_default()
                .parse()?,
            allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            ),
            jwt_signing_key,
            token_ttl,
            database_backend: env::var("DATABASE_BACKEND")
                .unwrap_or_else(|_| "firestore".to_string())
                .parse()?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            db_connect_attempts: parse_var::<u32>("DB_CONNECT_ATTEMPTS", 3)?.max(1),
            admin_only_delete: parse_var("ADMIN_ONLY_DELETE", false)?,
            strict_connector_types: parse_var("STRICT_CONNECTOR_TYPES", false)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        _ => Ok(default),
    }
}

fn token_ttl_from_hours(hours: i64) -> Result<chrono::Duration, ConfigError> {
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid(
            "JWT_EXPIRES_IN_HOURS",
            format!("{} (must be between 1 and {})", hours, MAX_TOKEN_TTL_HOURS),
        ));
    }
    chrono::Duration::try_hours(hours)
        .ok_or_else(|| ConfigError::Invalid("JWT_EXPIRES_IN_HOURS", hours.to_string()))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
