//! Core types for ShopRate.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod principal;
pub mod rating;
pub mod role;
pub mod validation;

pub use email::{Email, EmailError};
pub use id::*;
pub use principal::{AccessError, Principal, authorize};
pub use rating::{Rating, RatingOutOfRange};
pub use role::Role;
pub use validation::ValidationError;
