//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin account
//! shoprate admin create -u boss -p "a strong password" -e boss@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `PORTAL_DATABASE_URL` (or `DATABASE_URL`) - `SQLite` connection string

use thiserror::Error;

use shoprate_portal::config::{ConfigError, PortalConfig};
use shoprate_portal::db;
use shoprate_portal::services::{IdentityError, IdentityService, Registration};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Account details were rejected or the username is taken.
    #[error("{0}")]
    Identity(#[from] IdentityError),
}

/// Create a new admin account.
///
/// Applies the same validation as web registration; only the stored
/// role differs.
///
/// # Errors
///
/// Returns `AdminError::Identity` when any account rule is violated,
/// including a taken username.
pub async fn create_user(
    username: &str,
    password: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
) -> Result<(), AdminError> {
    let config = PortalConfig::from_env()?;

    tracing::info!("Connecting to portal database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Creating admin account: {username} ({email})");

    let identity = IdentityService::new(&pool);
    let registration = Registration {
        first_name,
        last_name,
        email,
        phone,
        username,
        password,
        password_confirm: password,
    };
    let user_id = identity.create_admin(&registration).await?;

    tracing::info!(%user_id, "Admin account created successfully");
    Ok(())
}
