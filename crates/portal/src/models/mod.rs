//! Domain models for the portal.
//!
//! These are the validated shapes the services and templates work with,
//! distinct from the `db` module's internal row types.

pub mod review;
pub mod session;
pub mod shop;
pub mod user;

pub use review::{OneStarContact, Review, ShopAverage, ShopReview, UserReview};
pub use session::{CurrentUser, keys as session_keys};
pub use shop::Shop;
pub use user::User;
