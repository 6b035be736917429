//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use shoprate_core::{Principal, Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Name shown in the navigation bar.
    pub display_name: String,
    /// Access role.
    pub role: Role,
}

impl CurrentUser {
    /// Whether this session belongs to an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// The principal this session represents, for authorization checks.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
            display_name: self.display_name.clone(),
        }
    }
}

impl From<Principal> for CurrentUser {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            display_name: principal.display_name,
            role: principal.role,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
