//! Authentication route handlers.
//!
//! Registration, login, and logout. Validation failures re-render the
//! submitting form with the full list of reasons; passwords are never
//! echoed back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, sign_in, sign_out};
use crate::models::CurrentUser;
use crate::services::{IdentityError, IdentityService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
///
/// Every field defaults to empty so a missing field becomes a
/// validation reason instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub errors: Vec<String>,
    pub form: RegisterForm,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let success = query.success.as_deref().and_then(|s| match s {
        "registered" => Some("Registration successful. Please log in.".to_string()),
        _ => None,
    });
    let error = query.error.as_deref().and_then(|e| match e {
        "session" => Some("Session error. Please try again.".to_string()),
        _ => None,
    });

    LoginTemplate {
        user,
        error,
        success,
        username: String::new(),
    }
}

/// Handle login form submission.
///
/// A wrong username and a wrong password produce the same response, so
/// the form cannot be used to probe which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let identity = IdentityService::new(state.pool());

    match identity.authenticate(&form.username, &form.password).await {
        Ok(principal) => {
            set_sentry_user(&principal.id, Some(&principal.display_name));
            let current_user = CurrentUser::from(principal);

            if let Err(e) = sign_in(&session, &current_user).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }

            let destination = if current_user.is_admin() { "/admin" } else { "/" };
            Redirect::to(destination).into_response()
        }
        Err(IdentityError::InvalidCredentials) => {
            tracing::warn!("Login failed");
            let template = LoginTemplate {
                user: None,
                error: Some("Invalid credentials".to_string()),
                success: None,
                username: form.username,
            };
            (StatusCode::UNAUTHORIZED, template).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    RegisterTemplate {
        user,
        errors: Vec::new(),
        form: RegisterForm::default(),
    }
}

/// Handle registration form submission.
///
/// On validation failure the form is re-rendered with every violated
/// rule at once, echoing everything except the passwords.
pub async fn register(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Form(mut form): Form<RegisterForm>,
) -> Response {
    let identity = IdentityService::new(state.pool());
    let registration = Registration {
        first_name: &form.first_name,
        last_name: &form.last_name,
        email: &form.email,
        phone: &form.phone,
        username: &form.username,
        password: &form.password,
        password_confirm: &form.password_confirm,
    };

    match identity.register(&registration).await {
        Ok(user_id) => {
            tracing::info!(%user_id, "New customer registered");
            Redirect::to("/auth/login?success=registered").into_response()
        }
        Err(IdentityError::Validation(validation)) => {
            form.password.clear();
            form.password_confirm.clear();
            let template = RegisterTemplate {
                user,
                errors: validation.reasons,
                form,
            };
            (StatusCode::BAD_REQUEST, template).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the whole session and drops the Sentry user context.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = sign_out(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
