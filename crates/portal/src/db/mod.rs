//! Database operations for the portal `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Credential records for customers and admins
//! - `shops` - Franchise shop catalog
//! - `reviews` - Review ledger, one row per submitted review
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/portal/migrations/` and run on
//! startup, or explicitly via:
//! ```bash
//! cargo run -p shoprate-cli -- migrate
//! ```

pub mod reviews;
pub mod shops;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use reviews::ReviewRepository;
pub use shops::ShopRepository;
pub use users::UserRepository;

/// Embedded migrations, compiled into the binary.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing. Foreign keys are enforced
/// on every connection; `SQLite` leaves them off by default.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the database
/// cannot be opened.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
