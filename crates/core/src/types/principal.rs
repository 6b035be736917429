//! Authenticated principal and the authorization gate.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;
use crate::types::role::Role;

/// Errors produced by [`authorize`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// No principal present; nobody is signed in.
    #[error("authentication required")]
    Unauthenticated,
    /// A principal is present but its role does not satisfy the requirement.
    #[error("insufficient permissions")]
    Forbidden,
}

/// An authenticated identity.
///
/// Established once by authentication, carried in the session, and passed
/// explicitly into every protected operation. Immutable for the lifetime of
/// the session: role changes take effect at the next sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Credential record this principal was authenticated against.
    pub id: UserId,
    /// Role stored on the credential record at sign-in time.
    pub role: Role,
    /// Name shown in the navigation bar.
    pub display_name: String,
}

/// The single authorization chokepoint.
///
/// Every protected operation calls this exactly once, before touching any
/// data. Matching is exact: admin-gated operations admit only admins, and
/// customer-gated operations admit only customers. Admins do not hold
/// customer credentials, so letting them through a customer gate would
/// produce review records that no customer owns.
///
/// # Errors
///
/// [`AccessError::Unauthenticated`] when `principal` is `None`, and
/// [`AccessError::Forbidden`] when the role does not match `required`.
pub fn authorize(
    principal: Option<&Principal>,
    required: Role,
) -> Result<&Principal, AccessError> {
    let principal = principal.ok_or(AccessError::Unauthenticated)?;
    match (principal.role, required) {
        (Role::Customer, Role::Customer) | (Role::Admin, Role::Admin) => Ok(principal),
        (Role::Customer, Role::Admin) | (Role::Admin, Role::Customer) => {
            Err(AccessError::Forbidden)
        }
    }
}
