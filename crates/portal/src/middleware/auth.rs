//! Authentication extractors and session helpers.
//!
//! Handlers extract the session identity with [`OptionalAuth`] and pass
//! the derived principal to the services, which own the role gates.
//! There is no "require auth" extractor: every gate goes through
//! `shoprate_core::authorize`, handlers included.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that optionally gets the current user.
///
/// Never rejects; anonymous requests extract `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.display_name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to store the logged-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the session on logout.
///
/// Flushes the whole session record, not just the user key, so nothing
/// lingers server-side after logout.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.flush().await?;
    Ok(())
}
