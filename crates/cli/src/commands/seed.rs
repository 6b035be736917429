//! Seed the database with demo shops.
//!
//! Gives a fresh install something to review. The seed is skipped when
//! the catalog already has shops, so rerunning it cannot duplicate data.

use shoprate_portal::config::PortalConfig;
use shoprate_portal::db;
use shoprate_portal::db::shops::{ShopDraft, ShopRepository};

const DEMO_SHOPS: &[(&str, &str, &str)] = &[
    ("FreshMart Central", "12 Market Street", "Manchester"),
    ("FreshMart North", "3 Mill Lane", "Leeds"),
    ("FreshMart Riverside", "48 Quay Road", "Bristol"),
];

/// Insert demo shops for local development.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a database operation
/// fails.
pub async fn demo_shops() -> Result<(), Box<dyn std::error::Error>> {
    let config = PortalConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;

    let shops = ShopRepository::new(&pool);
    if !shops.list().await?.is_empty() {
        tracing::info!("Shop catalog is not empty, skipping seed");
        return Ok(());
    }

    for &(name, address, city) in DEMO_SHOPS {
        let id = shops
            .create(&ShopDraft {
                name,
                address,
                city,
            })
            .await?;
        tracing::info!(%id, name, "Seeded shop");
    }

    tracing::info!("Seeded {} demo shops", DEMO_SHOPS.len());
    Ok(())
}
