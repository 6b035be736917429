//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults produce a self-contained
//! local deployment backed by a `SQLite` file in the working directory.
//!
//! - `PORTAL_DATABASE_URL` - `SQLite` connection string (default: `sqlite://shoprate.db`)
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `PORTAL_BASE_URL` - Public URL for the portal (default: <http://localhost:3000>)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://shoprate.db";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the portal
    pub base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PORTAL_DATABASE_URL");
        let host = get_env_or_default("PORTAL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORTAL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("PORTAL_BASE_URL", "http://localhost:3000");
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> SecretString {
    if let Ok(value) = std::env::var(primary_key) {
        return SecretString::from(value);
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from(DEFAULT_DATABASE_URL)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
