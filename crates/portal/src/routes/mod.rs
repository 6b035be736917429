//! HTTP route handlers for the review portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page with per-shop averages
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Registration page
//! POST /auth/register          - Registration action
//! POST /auth/logout            - Logout action
//!
//! # Shops (public)
//! GET  /shops                  - Shop listing
//! GET  /shops/{id}/reviews     - One shop's reviews
//!
//! # Reviews (customer session required)
//! GET  /reviews/new            - Review form
//! POST /reviews                - Submit a review
//! GET  /reviews/mine           - Own review history
//!
//! # Admin (admin session required)
//! GET  /admin                  - Dashboard with averages and one-star contacts
//! GET  /admin/shops/new        - Shop form (create)
//! POST /admin/shops/new        - Create shop
//! GET  /admin/shops/{id}/edit  - Shop form (edit)
//! POST /admin/shops/{id}/edit  - Update shop
//! POST /admin/shops/{id}/delete - Delete shop
//! GET  /admin/shops/{id}/reviews - One shop's reviews (admin view)
//! ```

pub mod admin;
pub mod auth;
pub mod home;
pub mod reviews;
pub mod shops;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the public shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::index))
        .route("/{id}/reviews", get(shops::reviews))
}

/// Create the customer review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::submit))
        .route("/new", get(reviews::new_review))
        .route("/mine", get(reviews::mine))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route(
            "/shops/new",
            get(admin::new_shop_form).post(admin::create_shop),
        )
        .route(
            "/shops/{id}/edit",
            get(admin::edit_shop_form).post(admin::update_shop),
        )
        .route("/shops/{id}/delete", post(admin::delete_shop))
        .route("/shops/{id}/reviews", get(admin::shop_reviews))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Public shop pages
        .nest("/shops", shop_routes())
        // Customer review pages
        .nest("/reviews", review_routes())
        // Admin area
        .nest("/admin", admin_routes())
        // Auth pages
        .nest("/auth", auth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub user: Option<CurrentUser>,
}

/// Fallback handler for unknown paths.
pub async fn not_found(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate { user })
}
