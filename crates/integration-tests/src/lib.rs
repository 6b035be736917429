//! Shared test harness for ShopRate integration tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shoprate-integration-tests
//! ```
//!
//! Every test builds its own migrated in-memory `SQLite` database, so the
//! suite needs no external services and tests can run in parallel. The
//! HTTP tests additionally serve the full portal router on an ephemeral
//! port via [`spawn_portal`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use shoprate_core::{Principal, ReviewId, ShopId};
use shoprate_portal::config::PortalConfig;
use shoprate_portal::db::MIGRATOR;
use shoprate_portal::db::shops::{ShopDraft, ShopRepository};
use shoprate_portal::services::{IdentityService, Registration, ReviewService, ReviewSubmission};
use shoprate_portal::state::AppState;

/// Create a migrated in-memory database.
///
/// The pool is capped at one connection: an in-memory `SQLite` database
/// exists per connection, and a second connection would see an empty
/// schema.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Failed to parse sqlite options")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory pool");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");

    pool
}

/// Configuration for a test portal instance.
///
/// The `http://` base URL keeps the session cookie non-secure so a plain
/// HTTP client can carry it.
#[must_use]
pub fn test_config() -> PortalConfig {
    PortalConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        sentry_dsn: None,
    }
}

/// Serve the portal on an ephemeral port and return its base URL.
pub async fn spawn_portal(pool: SqlitePool) -> String {
    let state = AppState::new(test_config(), pool);
    let app = shoprate_portal::build_app(state)
        .await
        .expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener
        .local_addr()
        .expect("Failed to read listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    format!("http://{addr}")
}

/// Register a customer and return their authenticated principal.
pub async fn customer(pool: &SqlitePool, username: &str) -> Principal {
    customer_named(pool, username, "Test", "Customer").await
}

/// Register a customer with explicit names and return their principal.
pub async fn customer_named(
    pool: &SqlitePool,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> Principal {
    let identity = IdentityService::new(pool);
    let email = format!("{username}@example.com");
    let registration = Registration {
        first_name,
        last_name,
        email: &email,
        phone: "0100 000000",
        username,
        password: "password123",
        password_confirm: "password123",
    };
    identity
        .register(&registration)
        .await
        .expect("Failed to register test customer");

    identity
        .authenticate(username, "password123")
        .await
        .expect("Failed to authenticate test customer")
}

/// Provision an admin account and return their authenticated principal.
pub async fn admin(pool: &SqlitePool, username: &str) -> Principal {
    let identity = IdentityService::new(pool);
    let email = format!("{username}@example.com");
    let registration = Registration {
        first_name: "Admin",
        last_name: "User",
        email: &email,
        phone: "0100 000001",
        username,
        password: "password123",
        password_confirm: "password123",
    };
    identity
        .create_admin(&registration)
        .await
        .expect("Failed to create test admin");

    identity
        .authenticate(username, "password123")
        .await
        .expect("Failed to authenticate test admin")
}

/// Insert a shop directly through the repository.
pub async fn shop(pool: &SqlitePool, name: &str, city: &str) -> ShopId {
    ShopRepository::new(pool)
        .create(&ShopDraft {
            name,
            address: "1 High Street",
            city,
        })
        .await
        .expect("Failed to insert test shop")
}

/// Submit a review through the service as the given principal.
pub async fn submit_review(
    pool: &SqlitePool,
    principal: &Principal,
    shop_id: ShopId,
    rating: i64,
    review_date: &str,
) -> ReviewId {
    let submission = ReviewSubmission {
        shop_id: shop_id.as_i64(),
        rating,
        body: None,
        review_date: Some(review_date),
    };
    ReviewService::new(pool)
        .submit(Some(principal), &submission)
        .await
        .expect("Failed to submit test review")
}
