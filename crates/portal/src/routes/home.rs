//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, ShopAverage};
use crate::services::ReviewService;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Logged-in user for the navigation bar, if any.
    pub user: Option<CurrentUser>,
    /// Per-shop averages, sorted by shop name.
    pub averages: Vec<ShopAverage>,
}

/// Display the home page with the public averages table.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<HomeTemplate> {
    let averages = ReviewService::new(state.pool()).averages_per_shop().await?;

    Ok(HomeTemplate { user, averages })
}
