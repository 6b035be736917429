//! Business logic services.
//!
//! Services own the role gates and validation; route handlers stay thin.
//! Each service borrows the pool and is constructed per request.

pub mod catalog;
pub mod identity;
pub mod reviews;

pub use catalog::{CatalogError, CatalogService};
pub use identity::{IdentityError, IdentityService, Registration};
pub use reviews::{ReviewError, ReviewService, ReviewSubmission};
