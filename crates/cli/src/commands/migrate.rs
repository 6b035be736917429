//! Database migration command.
//!
//! The portal also applies migrations at startup; this command exists
//! for deployments that want the schema step explicit, and for CI.
//!
//! # Usage
//!
//! ```bash
//! shoprate migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PORTAL_DATABASE_URL` (or `DATABASE_URL`) - `SQLite` connection string

use shoprate_portal::config::PortalConfig;
use shoprate_portal::db;

/// Run portal database migrations.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database cannot be
/// opened, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = PortalConfig::from_env()?;

    tracing::info!("Connecting to portal database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running portal migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Portal migrations complete!");
    Ok(())
}
