//! Review repository for the review ledger and its aggregations.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use shoprate_core::{Email, Rating, ReviewId, ShopId, UserId};

use super::RepositoryError;
use crate::models::{OneStarContact, Review, ShopAverage, ShopReview, UserReview};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for reviews joined with the shop name.
#[derive(Debug, sqlx::FromRow)]
struct UserReviewRow {
    id: i64,
    user_id: i64,
    shop_id: i64,
    rating: i64,
    body: Option<String>,
    review_date: NaiveDate,
    shop_name: String,
}

impl TryFrom<UserReviewRow> for UserReview {
    type Error = RepositoryError;

    fn try_from(row: UserReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(row.rating).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating in database: {e}"))
        })?;

        Ok(Self {
            review: Review {
                id: ReviewId::new(row.id),
                user_id: UserId::new(row.user_id),
                shop_id: ShopId::new(row.shop_id),
                rating,
                body: row.body,
                review_date: row.review_date,
            },
            shop_name: row.shop_name,
        })
    }
}

/// Internal row type for reviews joined with the reviewer's name.
#[derive(Debug, sqlx::FromRow)]
struct ShopReviewRow {
    id: i64,
    user_id: i64,
    shop_id: i64,
    rating: i64,
    body: Option<String>,
    review_date: NaiveDate,
    first_name: String,
    last_name: String,
}

impl TryFrom<ShopReviewRow> for ShopReview {
    type Error = RepositoryError;

    fn try_from(row: ShopReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(row.rating).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating in database: {e}"))
        })?;

        Ok(Self {
            review: Review {
                id: ReviewId::new(row.id),
                user_id: UserId::new(row.user_id),
                shop_id: ShopId::new(row.shop_id),
                rating,
                body: row.body,
                review_date: row.review_date,
            },
            reviewer_first_name: row.first_name,
            reviewer_last_name: row.last_name,
        })
    }
}

/// Internal row type for per-shop aggregate queries.
#[derive(Debug, sqlx::FromRow)]
struct AverageRow {
    id: i64,
    name: String,
    city: String,
    review_count: i64,
    rating_total: i64,
}

impl From<AverageRow> for ShopAverage {
    fn from(row: AverageRow) -> Self {
        // A shop with no reviews has no average, not an average of zero.
        #[allow(clippy::cast_precision_loss)] // Review counts never exceed f64 precision
        let average = if row.review_count > 0 {
            Some(row.rating_total as f64 / row.review_count as f64)
        } else {
            None
        };

        Self {
            shop_id: ShopId::new(row.id),
            name: row.name,
            city: row.city,
            average,
            review_count: row.review_count,
        }
    }
}

/// Internal row type for one-star contact queries.
#[derive(Debug, sqlx::FromRow)]
struct OneStarRow {
    shop_id: i64,
    shop_name: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    review_date: NaiveDate,
}

impl TryFrom<OneStarRow> for OneStarContact {
    type Error = RepositoryError;

    fn try_from(row: OneStarRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            shop_id: ShopId::new(row.shop_id),
            shop_name: row.shop_name,
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone: row.phone,
            review_date: row.review_date,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Validated review fields ready to persist.
#[derive(Debug)]
pub struct NewReview<'a> {
    pub user_id: UserId,
    pub shop_id: ShopId,
    pub rating: Rating,
    pub body: Option<&'a str>,
    pub review_date: NaiveDate,
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new review and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_review: &NewReview<'_>) -> Result<ReviewId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO reviews (user_id, shop_id, rating, body, review_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(new_review.user_id.as_i64())
        .bind(new_review.shop_id.as_i64())
        .bind(i64::from(new_review.rating))
        .bind(new_review.body)
        .bind(new_review.review_date)
        .fetch_one(self.pool)
        .await?;

        Ok(ReviewId::new(id))
    }

    /// List one user's reviews with shop names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored data is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<UserReview>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserReviewRow>(
            r"
            SELECT r.id, r.user_id, r.shop_id, r.rating, r.body, r.review_date,
                   s.name AS shop_name
            FROM reviews r
            JOIN shops s ON s.id = r.shop_id
            WHERE r.user_id = ?
            ORDER BY r.review_date DESC, r.id DESC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List one shop's reviews with reviewer names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored data is invalid.
    pub async fn list_for_shop(&self, shop_id: ShopId) -> Result<Vec<ShopReview>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopReviewRow>(
            r"
            SELECT r.id, r.user_id, r.shop_id, r.rating, r.body, r.review_date,
                   u.first_name, u.last_name
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.shop_id = ?
            ORDER BY r.review_date DESC, r.id DESC
            ",
        )
        .bind(shop_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Per-shop rating averages and review counts for every shop,
    /// sorted by shop name. Shops without reviews are included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn averages_per_shop(&self) -> Result<Vec<ShopAverage>, RepositoryError> {
        let rows = sqlx::query_as::<_, AverageRow>(
            r"
            SELECT s.id, s.name, s.city,
                   COUNT(r.id) AS review_count,
                   COALESCE(SUM(r.rating), 0) AS rating_total
            FROM shops s
            LEFT JOIN reviews r ON r.shop_id = s.id
            GROUP BY s.id, s.name, s.city
            ORDER BY s.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Contact details of every customer who left a one-star review,
    /// sorted by shop name then customer last name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored data is invalid.
    pub async fn one_star_contacts(&self) -> Result<Vec<OneStarContact>, RepositoryError> {
        let rows = sqlx::query_as::<_, OneStarRow>(
            r"
            SELECT s.id AS shop_id, s.name AS shop_name,
                   u.first_name, u.last_name, u.email, u.phone,
                   r.review_date
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            JOIN shops s ON s.id = r.shop_id
            WHERE r.rating = 1
            ORDER BY s.name, u.last_name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
