//! Admin route handlers.
//!
//! Dashboard with the aggregate views, shop catalog management, and the
//! per-shop review listing. Every handler is admin-gated; the verdict
//! comes from the same `authorize` call the services use, so a customer
//! session gets a 403 here exactly as it would calling the service.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shoprate_core::{Role, ShopId, authorize};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, OneStarContact, Shop, ShopAverage, ShopReview};
use crate::services::{CatalogError, CatalogService, ReviewService};
use crate::state::AppState;

use super::auth::MessageQuery;

// =============================================================================
// Form Types
// =============================================================================

/// Shop create/edit form data.
#[derive(Debug, Deserialize)]
pub struct ShopForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub user: Option<CurrentUser>,
    pub shops: Vec<Shop>,
    pub averages: Vec<ShopAverage>,
    pub one_star: Vec<OneStarContact>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Shop create/edit form template.
///
/// One template serves both flows; `heading` and `action` decide which.
#[derive(Template, WebTemplate)]
#[template(path = "admin/shop_form.html")]
pub struct ShopFormTemplate {
    pub user: Option<CurrentUser>,
    pub heading: String,
    pub action: String,
    pub errors: Vec<String>,
    pub name: String,
    pub address: String,
    pub city: String,
}

/// Admin view of one shop's reviews.
#[derive(Template, WebTemplate)]
#[template(path = "admin/shop_reviews.html")]
pub struct AdminShopReviewsTemplate {
    pub user: Option<CurrentUser>,
    pub shop: Shop,
    pub reviews: Vec<ShopReview>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Display the admin dashboard.
///
/// Shop catalog with management actions, the per-shop averages, and
/// contact details for every one-star review.
#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Result<DashboardTemplate> {
    let principal = user.as_ref().map(CurrentUser::principal);
    authorize(principal.as_ref(), Role::Admin)?;

    let catalog = CatalogService::new(state.pool());
    let reviews = ReviewService::new(state.pool());

    let shops = catalog.list().await?;
    let averages = reviews.averages_per_shop().await?;
    let one_star = reviews.one_star_contacts(principal.as_ref()).await?;

    let notice = query.success.as_deref().and_then(|s| match s {
        "created" => Some("Shop added.".to_string()),
        "updated" => Some("Shop updated.".to_string()),
        "deleted" => Some("Shop deleted.".to_string()),
        _ => None,
    });
    let error = query.error.as_deref().and_then(|e| match e {
        "has_reviews" => Some("Cannot delete a shop that still has reviews.".to_string()),
        _ => None,
    });

    Ok(DashboardTemplate {
        user,
        shops,
        averages,
        one_star,
        notice,
        error,
    })
}

// =============================================================================
// Shop Management
// =============================================================================

/// Display the empty shop form.
pub async fn new_shop_form(OptionalAuth(user): OptionalAuth) -> Result<ShopFormTemplate> {
    let principal = user.as_ref().map(CurrentUser::principal);
    authorize(principal.as_ref(), Role::Admin)?;

    Ok(ShopFormTemplate {
        user,
        heading: "Add Shop".to_string(),
        action: "/admin/shops/new".to_string(),
        errors: Vec::new(),
        name: String::new(),
        address: String::new(),
        city: String::new(),
    })
}

/// Handle shop creation.
pub async fn create_shop(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ShopForm>,
) -> Response {
    let principal = user.as_ref().map(CurrentUser::principal);
    let catalog = CatalogService::new(state.pool());

    match catalog
        .create(principal.as_ref(), &form.name, &form.address, &form.city)
        .await
    {
        Ok(shop_id) => {
            tracing::info!(%shop_id, "Shop added");
            Redirect::to("/admin?success=created").into_response()
        }
        Err(CatalogError::Validation(validation)) => {
            let template = ShopFormTemplate {
                user,
                heading: "Add Shop".to_string(),
                action: "/admin/shops/new".to_string(),
                errors: validation.reasons,
                name: form.name,
                address: form.address,
                city: form.city,
            };
            (StatusCode::BAD_REQUEST, template).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Display the shop form prefilled with the shop's current fields.
#[instrument(skip(state))]
pub async fn edit_shop_form(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(shop_id): Path<i64>,
) -> Result<ShopFormTemplate> {
    let principal = user.as_ref().map(CurrentUser::principal);
    authorize(principal.as_ref(), Role::Admin)?;

    let shop = CatalogService::new(state.pool())
        .get(ShopId::new(shop_id))
        .await?;

    Ok(ShopFormTemplate {
        user,
        heading: "Edit Shop".to_string(),
        action: format!("/admin/shops/{shop_id}/edit"),
        errors: Vec::new(),
        name: shop.name,
        address: shop.address,
        city: shop.city,
    })
}

/// Handle shop update.
pub async fn update_shop(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(shop_id): Path<i64>,
    Form(form): Form<ShopForm>,
) -> Response {
    let principal = user.as_ref().map(CurrentUser::principal);
    let catalog = CatalogService::new(state.pool());

    match catalog
        .update(
            principal.as_ref(),
            ShopId::new(shop_id),
            &form.name,
            &form.address,
            &form.city,
        )
        .await
    {
        Ok(()) => {
            tracing::info!(shop_id, "Shop updated");
            Redirect::to("/admin?success=updated").into_response()
        }
        Err(CatalogError::Validation(validation)) => {
            let template = ShopFormTemplate {
                user,
                heading: "Edit Shop".to_string(),
                action: format!("/admin/shops/{shop_id}/edit"),
                errors: validation.reasons,
                name: form.name,
                address: form.address,
                city: form.city,
            };
            (StatusCode::BAD_REQUEST, template).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Handle shop deletion.
///
/// A shop that still has reviews is left untouched; the dashboard
/// reports why instead.
pub async fn delete_shop(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(shop_id): Path<i64>,
) -> Response {
    let principal = user.as_ref().map(CurrentUser::principal);
    let catalog = CatalogService::new(state.pool());

    match catalog.delete(principal.as_ref(), ShopId::new(shop_id)).await {
        Ok(()) => {
            tracing::info!(shop_id, "Shop deleted");
            Redirect::to("/admin?success=deleted").into_response()
        }
        Err(CatalogError::HasReviews) => {
            Redirect::to("/admin?error=has_reviews").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Display one shop's reviews with reviewer names.
#[instrument(skip(state))]
pub async fn shop_reviews(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(shop_id): Path<i64>,
) -> Result<AdminShopReviewsTemplate> {
    let principal = user.as_ref().map(CurrentUser::principal);
    authorize(principal.as_ref(), Role::Admin)?;

    let shop_id = ShopId::new(shop_id);
    let shop = CatalogService::new(state.pool()).get(shop_id).await?;
    let reviews = ReviewService::new(state.pool())
        .list_for_shop(shop_id)
        .await?;

    Ok(AdminShopReviewsTemplate {
        user,
        shop,
        reviews,
    })
}
