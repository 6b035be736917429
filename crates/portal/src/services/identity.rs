//! Identity service.
//!
//! Registration, login, and admin provisioning for credential records.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use thiserror::Error;

use shoprate_core::{Email, Principal, Role, UserId, ValidationError};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Shared by the advisory pre-check and the constraint-violation fallback
/// so a lost race reads the same as an ordinary duplicate.
const USERNAME_TAKEN: &str = "Username already taken";

/// Errors that can occur during identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// One or more registration fields failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Raw registration input, exactly as submitted.
#[derive(Debug)]
pub struct Registration<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

/// Identity service.
///
/// Handles registration, login, and admin provisioning.
pub struct IdentityService<'a> {
    users: UserRepository<'a>,
}

impl<'a> IdentityService<'a> {
    /// Create a new identity service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new customer account.
    ///
    /// Collects every violated rule into a single `ValidationError` rather
    /// than stopping at the first, so the form can report all of them at
    /// once. No record is written unless every rule passes.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Validation` listing all violations.
    /// Returns `IdentityError::PasswordHash` if hashing fails.
    /// Returns `IdentityError::Repository` for database errors.
    pub async fn register(
        &self,
        registration: &Registration<'_>,
    ) -> Result<UserId, IdentityError> {
        self.create_user(registration, Role::Customer).await
    }

    /// Provision an admin account.
    ///
    /// Applies the same validation as [`Self::register`]; only the stored
    /// role differs. There is no web route for this, only the CLI.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`].
    pub async fn create_admin(
        &self,
        registration: &Registration<'_>,
    ) -> Result<UserId, IdentityError> {
        self.create_user(registration, Role::Admin).await
    }

    async fn create_user(
        &self,
        registration: &Registration<'_>,
        role: Role,
    ) -> Result<UserId, IdentityError> {
        let first_name = registration.first_name.trim();
        let last_name = registration.last_name.trim();
        let phone = registration.phone.trim();
        let username = registration.username.trim();

        let mut reasons = Vec::new();
        if first_name.is_empty() {
            reasons.push("First name is required".to_owned());
        }
        if last_name.is_empty() {
            reasons.push("Last name is required".to_owned());
        }
        let email = match Email::parse(registration.email.trim()) {
            Ok(email) => Some(email),
            Err(_) => {
                reasons.push("Valid email required".to_owned());
                None
            }
        };
        if username.is_empty() {
            reasons.push("Username is required".to_owned());
        }
        if registration.password.len() < MIN_PASSWORD_LENGTH {
            reasons.push(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
        if registration.password != registration.password_confirm {
            reasons.push("Passwords do not match".to_owned());
        }
        if !username.is_empty() && self.users.username_taken(username).await? {
            reasons.push(USERNAME_TAKEN.to_owned());
        }

        let Some(email) = email else {
            return Err(ValidationError::new(reasons).into());
        };
        if !reasons.is_empty() {
            return Err(ValidationError::new(reasons).into());
        }

        let password_hash = hash_password(registration.password)?;

        let new_user = NewUser {
            first_name,
            last_name,
            email: &email,
            phone,
            username,
            password_hash: &password_hash,
            role,
        };

        // The UNIQUE constraint closes the window between the advisory
        // check above and this insert.
        self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                ValidationError::new(vec![USERNAME_TAKEN.to_owned()]).into()
            }
            other => IdentityError::Repository(other),
        })
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Authenticate a username/password pair.
    ///
    /// Uniform `InvalidCredentials` for unknown usernames and wrong
    /// passwords, so the portal never leaks which usernames exist.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidCredentials` if the pair is wrong.
    /// Returns `IdentityError::Repository` for database errors.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Principal, IdentityError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let password_hash = self
            .users
            .password_hash(user.id)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(Principal {
            id: user.id,
            role: user.role,
            display_name: user.first_name,
        })
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| IdentityError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), IdentityError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| IdentityError::InvalidCredentials)
}
