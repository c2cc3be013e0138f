//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use chrono::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Length of the aggregation window, in hours
    pub follow_window_hours: i64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let follow_window_hours = parse_window_hours(env::var("FOLLOW_WINDOW_HOURS").ok())?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            follow_window_hours,
            environment,
        })
    }

    /// Aggregation window as a duration
    pub fn window(&self) -> Duration {
        Duration::hours(self.follow_window_hours)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_window_hours(raw: Option<String>) -> Result<i64, ConfigError> {
    let hours: i64 = raw
        .unwrap_or_else(|| "24".to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue("FOLLOW_WINDOW_HOURS"))?;

    if hours <= 0 {
        return Err(ConfigError::InvalidValue("FOLLOW_WINDOW_HOURS"));
    }

    Ok(hours)
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
