//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use shoprate_core::{AccessError, ValidationError};

use crate::db::RepositoryError;
use crate::services::{CatalogError, IdentityError, ReviewError};

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Identity operation failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Review operation failed.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Caller is not allowed to perform this operation.
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Anonymous callers get the login form, not a bare status page
        if matches!(self.access_error(), Some(AccessError::Unauthenticated)) {
            return Redirect::to("/auth/login").into_response();
        }

        (self.status_code(), self.client_message()).into_response()
    }
}

impl AppError {
    /// The repository error carried by this error, at any nesting depth.
    fn repository_error(&self) -> Option<&RepositoryError> {
        match self {
            Self::Database(e)
            | Self::Identity(IdentityError::Repository(e))
            | Self::Catalog(CatalogError::Repository(e))
            | Self::Review(ReviewError::Repository(e)) => Some(e),
            _ => None,
        }
    }

    /// The access error carried by this error, at any nesting depth.
    fn access_error(&self) -> Option<&AccessError> {
        match self {
            Self::Access(e)
            | Self::Catalog(CatalogError::Denied(e))
            | Self::Review(ReviewError::Denied(e)) => Some(e),
            _ => None,
        }
    }

    /// The validation error carried by this error, at any nesting depth.
    fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Identity(IdentityError::Validation(e))
            | Self::Catalog(CatalogError::Validation(e))
            | Self::Review(ReviewError::Validation(e)) => Some(e),
            _ => None,
        }
    }

    /// Whether this error is the server's fault and worth a Sentry event.
    fn is_server_error(&self) -> bool {
        if matches!(
            self,
            Self::Internal(_) | Self::Identity(IdentityError::PasswordHash)
        ) {
            return true;
        }
        self.repository_error().is_some_and(|e| {
            matches!(
                e,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
            )
        })
    }

    fn status_code(&self) -> StatusCode {
        if let Some(err) = self.repository_error() {
            return match err {
                RepositoryError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
                RepositoryError::DataCorruption(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
            };
        }
        if self.validation_error().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if self.access_error().is_some() {
            // Unauthenticated was redirected before this point
            return StatusCode::FORBIDDEN;
        }

        match self {
            Self::Identity(IdentityError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Catalog(CatalogError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::HasReviews) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Never exposes internal error details.
    fn client_message(&self) -> String {
        if let Some(err) = self.repository_error() {
            return match err {
                RepositoryError::Database(_) => "Service temporarily unavailable".to_string(),
                RepositoryError::DataCorruption(_) => "Internal server error".to_string(),
                RepositoryError::NotFound => "Not found".to_string(),
                RepositoryError::Conflict(msg) => msg.clone(),
            };
        }
        if let Some(err) = self.validation_error() {
            return err.to_string();
        }
        if self.access_error().is_some() {
            return "Not permitted".to_string();
        }

        match self {
            Self::Identity(IdentityError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Catalog(CatalogError::NotFound) => "Shop not found".to_string(),
            Self::Catalog(CatalogError::HasReviews) => "Shop still has reviews".to_string(),
            Self::Internal(_) | Self::Identity(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
