//! Review ledger service.
//!
//! Review submission, per-customer history, per-shop listings, and the
//! admin aggregations. The ledger never trusts a caller-supplied user
//! id: a new review is always bound to the authenticated principal.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use thiserror::Error;

use shoprate_core::{AccessError, Principal, Rating, ReviewId, Role, ShopId, ValidationError, authorize};

use crate::db::RepositoryError;
use crate::db::reviews::{NewReview, ReviewRepository};
use crate::db::shops::ShopRepository;
use crate::models::{OneStarContact, ShopAverage, ShopReview, UserReview};

/// Errors that can occur during review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Caller is not allowed to perform this operation.
    #[error("{0}")]
    Denied(#[from] AccessError),

    /// One or more review fields failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Raw review input, exactly as submitted.
#[derive(Debug)]
pub struct ReviewSubmission<'a> {
    pub shop_id: i64,
    pub rating: i64,
    pub body: Option<&'a str>,
    /// ISO calendar date. Blank or missing means "today".
    pub review_date: Option<&'a str>,
}

/// Review ledger service.
pub struct ReviewService<'a> {
    reviews: ReviewRepository<'a>,
    shops: ShopRepository<'a>,
}

impl<'a> ReviewService<'a> {
    /// Create a new review service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            reviews: ReviewRepository::new(pool),
            shops: ShopRepository::new(pool),
        }
    }

    /// Submit a review as the authenticated customer.
    ///
    /// The role gate runs before any validation read so a denied caller
    /// learns nothing about the catalog. Validation collects every
    /// violated rule into one `ValidationError`. The stored `user_id` is
    /// always `principal.id`; nothing in the submission can redirect a
    /// review to another account.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Denied` if the caller is not a customer.
    /// Returns `ReviewError::Validation` listing all violations.
    /// Returns `ReviewError::Repository` for database errors.
    pub async fn submit(
        &self,
        principal: Option<&Principal>,
        submission: &ReviewSubmission<'_>,
    ) -> Result<ReviewId, ReviewError> {
        let principal = authorize(principal, Role::Customer)?;

        let mut reasons = Vec::new();

        let shop_id = ShopId::new(submission.shop_id);
        if self.shops.get(shop_id).await?.is_none() {
            reasons.push("Please choose a valid shop".to_owned());
        }

        let rating = match Rating::new(submission.rating) {
            Ok(rating) => Some(rating),
            Err(_) => {
                reasons.push("Rating must be 1-5".to_owned());
                None
            }
        };

        let review_date = match submission.review_date.map(str::trim) {
            None | Some("") => Some(Utc::now().date_naive()),
            Some(raw) => match raw.parse::<NaiveDate>() {
                Ok(date) => Some(date),
                Err(_) => {
                    reasons.push("Review date must be a valid date".to_owned());
                    None
                }
            },
        };

        let body = submission.body.map(str::trim).filter(|b| !b.is_empty());

        match (rating, review_date, reasons.is_empty()) {
            (Some(rating), Some(review_date), true) => {
                let new_review = NewReview {
                    user_id: principal.id,
                    shop_id,
                    rating,
                    body,
                    review_date,
                };
                Ok(self.reviews.create(&new_review).await?)
            }
            _ => Err(ValidationError::new(reasons).into()),
        }
    }

    /// The authenticated customer's own review history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Denied` if the caller is not a customer.
    /// Returns `ReviewError::Repository` for database errors.
    pub async fn list_for_user(
        &self,
        principal: Option<&Principal>,
    ) -> Result<Vec<UserReview>, ReviewError> {
        let principal = authorize(principal, Role::Customer)?;
        Ok(self.reviews.list_for_user(principal.id).await?)
    }

    /// One shop's reviews with reviewer names, newest first. Public.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` for database errors.
    pub async fn list_for_shop(&self, shop_id: ShopId) -> Result<Vec<ShopReview>, ReviewError> {
        Ok(self.reviews.list_for_shop(shop_id).await?)
    }

    /// Per-shop averages and review counts, sorted by shop name. Public.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` for database errors.
    pub async fn averages_per_shop(&self) -> Result<Vec<ShopAverage>, ReviewError> {
        Ok(self.reviews.averages_per_shop().await?)
    }

    /// Contact details for every one-star reviewer. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Denied` if the caller is not an admin.
    /// Returns `ReviewError::Repository` for database errors.
    pub async fn one_star_contacts(
        &self,
        principal: Option<&Principal>,
    ) -> Result<Vec<OneStarContact>, ReviewError> {
        authorize(principal, Role::Admin)?;
        Ok(self.reviews.one_star_contacts().await?)
    }
}
