//! Shop repository for the franchise catalog.

use sqlx::SqlitePool;

use shoprate_core::ShopId;

use super::RepositoryError;
use crate::models::Shop;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for shop queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: i64,
    name: String,
    address: String,
    city: String,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Self {
            id: ShopId::new(row.id),
            name: row.name,
            address: row.address,
            city: row.city,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Validated shop fields ready to persist.
#[derive(Debug)]
pub struct ShopDraft<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
}

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all shops, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Shop>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, name, address, city
            FROM shops
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a shop by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, name, address, city
            FROM shops
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a new shop and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ShopDraft<'_>) -> Result<ShopId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO shops (name, address, city)
            VALUES (?, ?, ?)
            RETURNING id
            ",
        )
        .bind(draft.name)
        .bind(draft.address)
        .bind(draft.city)
        .fetch_one(self.pool)
        .await?;

        Ok(ShopId::new(id))
    }

    /// Update an existing shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no shop has the given id.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, id: ShopId, draft: &ShopDraft<'_>) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shops
            SET name = ?, address = ?, city = ?
            WHERE id = ?
            ",
        )
        .bind(draft.name)
        .bind(draft.address)
        .bind(draft.city)
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a shop that has no reviews.
    ///
    /// The review count check and the delete run in one transaction so a
    /// review committed in between cannot orphan itself. The foreign key
    /// on `reviews.shop_id` backstops the same rule.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the shop still has reviews.
    /// Returns `RepositoryError::NotFound` if no shop has the given id.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn delete(&self, id: ShopId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let review_count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM reviews
            WHERE shop_id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_one(&mut *tx)
        .await?;

        if review_count > 0 {
            return Err(RepositoryError::Conflict(
                "shop still has reviews".to_owned(),
            ));
        }

        let result = sqlx::query(
            r"
            DELETE FROM shops
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
