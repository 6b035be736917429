//! Public shop route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use shoprate_core::ShopId;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Shop, ShopReview};
use crate::services::{CatalogService, ReviewService};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Shop listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "shops/index.html")]
pub struct ShopsTemplate {
    pub user: Option<CurrentUser>,
    pub shops: Vec<Shop>,
}

/// Per-shop review listing template.
#[derive(Template, WebTemplate)]
#[template(path = "shops/reviews.html")]
pub struct ShopReviewsTemplate {
    pub user: Option<CurrentUser>,
    pub shop: Shop,
    pub reviews: Vec<ShopReview>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display all shops, alphabetically.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<ShopsTemplate> {
    let catalog = CatalogService::new(state.pool());
    let shops = catalog.list().await?;

    Ok(ShopsTemplate { user, shops })
}

/// Display every review for one shop, newest first.
#[instrument(skip(state))]
pub async fn reviews(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(shop_id): Path<i64>,
) -> Result<ShopReviewsTemplate> {
    let shop_id = ShopId::new(shop_id);
    let catalog = CatalogService::new(state.pool());
    let shop = catalog.get(shop_id).await?;

    let reviews = ReviewService::new(state.pool())
        .list_for_shop(shop_id)
        .await?;

    Ok(ShopReviewsTemplate {
        user,
        shop,
        reviews,
    })
}
