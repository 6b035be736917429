//! Review domain types, including the joined shapes the list and
//! aggregation queries return.

use chrono::NaiveDate;

use shoprate_core::{Email, Rating, ReviewId, ShopId, UserId};

/// A submitted review (domain type).
#[derive(Debug, Clone)]
pub struct Review {
    /// Unique review ID.
    pub id: ReviewId,
    /// Customer who wrote the review.
    pub user_id: UserId,
    /// Shop the review is about.
    pub shop_id: ShopId,
    /// Star rating, 1 to 5.
    pub rating: Rating,
    /// Optional free-text comment.
    pub body: Option<String>,
    /// Calendar date the review is dated to.
    pub review_date: NaiveDate,
}

/// A review as shown in a customer's own history, with the shop name joined in.
#[derive(Debug, Clone)]
pub struct UserReview {
    pub review: Review,
    pub shop_name: String,
}

/// A review as shown on a shop's page, with the reviewer's name joined in.
#[derive(Debug, Clone)]
pub struct ShopReview {
    pub review: Review,
    pub reviewer_first_name: String,
    pub reviewer_last_name: String,
}

/// Per-shop rating aggregate.
///
/// `average` is `None` for a shop with no reviews; an absent average is
/// not an average of zero. Rounding to two decimals happens at render
/// time, never here.
#[derive(Debug, Clone)]
pub struct ShopAverage {
    pub shop_id: ShopId,
    pub name: String,
    pub city: String,
    pub average: Option<f64>,
    pub review_count: i64,
}

/// Contact details for a customer who left a one-star review.
///
/// Admin-only analytics shape; exposes email and phone so staff can
/// follow up on bad experiences.
#[derive(Debug, Clone)]
pub struct OneStarContact {
    pub shop_id: ShopId,
    pub shop_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub review_date: NaiveDate,
}
