//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the ParkSpot API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 7000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info"); `RUST_LOG` takes precedence
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `STORE_TIMEOUT_SECONDS`: Bound on every database call (default: 5)
//! - `SESSION_TTL_HOURS`: Lifetime of a login session (default: 24)
//! - `STATIC_DIR`: Directory with the built web client, served as a fallback

use eyre::{Result, WrapErr};
use std::{env, path::PathBuf, time::Duration};
use tracing::Level;

/// Configuration for the ParkSpot API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Database operation timeout in seconds
    pub store_timeout: u64,

    /// Session lifetime in hours
    pub session_ttl_hours: i64,

    /// Web client build directory (optional)
    pub static_dir: Option<PathBuf>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "7000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 5);

        // Logging settings
        let log_level = parse_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = parse_or("API_REQUEST_TIMEOUT_SECONDS", 30);
        let store_timeout = parse_or("STORE_TIMEOUT_SECONDS", 5);

        // Session settings
        let session_ttl_hours = parse_or("SESSION_TTL_HOURS", 24);

        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            store_timeout,
            session_ttl_hours,
            static_dir,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:7000")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7000,
            database_url: String::new(),
            database_max_connections: 5,
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            store_timeout: 5,
            session_ttl_hours: 24,
            static_dir: None,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

pub(crate) fn parse_level(raw: &str) -> Level {
    match raw {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
