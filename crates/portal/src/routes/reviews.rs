//! Customer review route handlers.
//!
//! The review form, submission, and the signed-in customer's own
//! history. All three require a customer session; the role gate lives
//! in the service layer and these handlers surface its verdict.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use shoprate_core::{Role, authorize};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Shop, UserReview};
use crate::services::{CatalogService, ReviewError, ReviewService, ReviewSubmission};
use crate::state::AppState;

use super::auth::MessageQuery;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub shop_id: i64,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub review_date: String,
}

/// Optional shop preselection for the review form.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub shop_id: Option<i64>,
}

// =============================================================================
// Templates
// =============================================================================

/// Review form template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/new.html")]
pub struct NewReviewTemplate {
    pub user: Option<CurrentUser>,
    pub shops: Vec<Shop>,
    pub errors: Vec<String>,
    pub selected_shop: i64,
    pub rating: i64,
    pub body: String,
    pub review_date: String,
}

/// Customer review history template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/mine.html")]
pub struct MyReviewsTemplate {
    pub user: Option<CurrentUser>,
    pub reviews: Vec<UserReview>,
    pub notice: Option<String>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the review form.
///
/// Prefills a five-star rating and today's date. A `?shop_id` query
/// parameter preselects that shop, so shop pages can link straight
/// into the form.
#[instrument(skip(state))]
pub async fn new_review(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<ShopQuery>,
) -> Result<NewReviewTemplate> {
    let principal = user.as_ref().map(CurrentUser::principal);
    authorize(principal.as_ref(), Role::Customer)?;

    let shops = CatalogService::new(state.pool()).list().await?;

    Ok(NewReviewTemplate {
        user,
        shops,
        errors: Vec::new(),
        selected_shop: query.shop_id.unwrap_or(0),
        rating: 5,
        body: String::new(),
        review_date: Utc::now().date_naive().to_string(),
    })
}

/// Handle review form submission.
///
/// On validation failure the form is re-rendered with the caller's
/// input intact and every violated rule listed.
pub async fn submit(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ReviewForm>,
) -> Response {
    let principal = user.as_ref().map(CurrentUser::principal);
    let submission = ReviewSubmission {
        shop_id: form.shop_id,
        rating: form.rating,
        body: Some(&form.body),
        review_date: Some(&form.review_date),
    };

    let service = ReviewService::new(state.pool());
    match service.submit(principal.as_ref(), &submission).await {
        Ok(review_id) => {
            tracing::info!(%review_id, "Review recorded");
            Redirect::to("/reviews/mine?success=recorded").into_response()
        }
        Err(ReviewError::Validation(validation)) => {
            let shops = match CatalogService::new(state.pool()).list().await {
                Ok(shops) => shops,
                Err(e) => return AppError::from(e).into_response(),
            };
            let template = NewReviewTemplate {
                user,
                shops,
                errors: validation.reasons,
                selected_shop: form.shop_id,
                rating: form.rating,
                body: form.body,
                review_date: form.review_date,
            };
            (StatusCode::BAD_REQUEST, template).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Display the signed-in customer's own reviews, newest first.
#[instrument(skip(state))]
pub async fn mine(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Result<MyReviewsTemplate> {
    let principal = user.as_ref().map(CurrentUser::principal);
    let reviews = ReviewService::new(state.pool())
        .list_for_user(principal.as_ref())
        .await?;

    let notice = query.success.as_deref().and_then(|s| match s {
        "recorded" => Some("Review recorded. Thank you!".to_string()),
        _ => None,
    });

    Ok(MyReviewsTemplate {
        user,
        reviews,
        notice,
    })
}
