//! ShopRate Portal library.
//!
//! This crate provides the review portal as a library, allowing it to be
//! tested and reused. The binary in `main.rs` wires configuration, Sentry,
//! and tracing around [`build_app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the portal router with all routes and middleware attached.
///
/// Sentry layers are not applied here; the binary adds them outermost so
/// test harnesses can serve this router without a Sentry client.
///
/// # Errors
///
/// Returns an error if the session store cannot run its migration.
pub async fn build_app(state: AppState) -> Result<Router, sqlx::Error> {
    let session_layer = middleware::create_session_layer(state.pool(), state.config()).await?;

    Ok(Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::readiness))
        .merge(routes::routes())
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state))
}
