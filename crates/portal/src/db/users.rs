//! User repository for credential records.
//!
//! Passwords are stored as Argon2 hashes in the `password_hash` column
//! and never leave this module except through [`UserRepository::password_hash`].

use sqlx::SqlitePool;

use shoprate_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::User;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    username: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

        Ok(Self {
            id: UserId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone: row.phone,
            username: row.username,
            role,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Fields required to persist a new credential record.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a Email,
    pub phone: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new credential record and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser<'_>) -> Result<UserId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO users (first_name, last_name, email, phone, username, password_hash, role)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email.as_str())
        .bind(new_user.phone)
        .bind(new_user.username)
        .bind(new_user.password_hash)
        .bind(new_user.role.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(UserId::new(id))
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored data is invalid.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, first_name, last_name, email, phone, username, role
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored data is invalid.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, first_name, last_name, email, phone, username, role
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get the stored password hash for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn password_hash(&self, id: UserId) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(hash)
    }

    /// Check whether a username is already registered.
    ///
    /// Advisory only; the UNIQUE constraint on `username` is what closes
    /// the check-then-insert race in [`Self::create`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn username_taken(&self, username: &str) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)
            ",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }
}
