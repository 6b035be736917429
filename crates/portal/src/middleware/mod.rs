//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `SQLite` store)

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, sign_in, sign_out};
pub use session::create_session_layer;
