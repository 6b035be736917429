//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use shoprate_core::{Email, Role, UserId};

/// A registered portal user (domain type).
///
/// Covers both customers and admins; the `role` field distinguishes them.
/// The password hash deliberately never appears here.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: Email,
    /// Contact phone number, free-form.
    pub phone: String,
    /// Login name, unique across the portal.
    pub username: String,
    /// Access role.
    pub role: Role,
}
