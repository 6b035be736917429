//! Shop catalog service.
//!
//! Public reads plus admin-gated catalog management. Every mutation
//! checks the caller's role before touching the database.

use sqlx::SqlitePool;
use thiserror::Error;

use shoprate_core::{AccessError, Principal, Role, ShopId, ValidationError, authorize};

use crate::db::RepositoryError;
use crate::db::shops::{ShopDraft, ShopRepository};
use crate::models::Shop;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Caller is not allowed to perform this operation.
    #[error("{0}")]
    Denied(#[from] AccessError),

    /// One or more shop fields failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced shop does not exist.
    #[error("shop not found")]
    NotFound,

    /// Shop still has reviews and cannot be deleted.
    #[error("shop still has reviews")]
    HasReviews,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

/// Shop catalog service.
pub struct CatalogService<'a> {
    shops: ShopRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            shops: ShopRepository::new(pool),
        }
    }

    /// List all shops sorted by name. Public.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` for database errors.
    pub async fn list(&self) -> Result<Vec<Shop>, CatalogError> {
        self.shops.list().await.map_err(CatalogError::Repository)
    }

    /// Look up a single shop. Public.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no shop has the given id.
    /// Returns `CatalogError::Repository` for database errors.
    pub async fn get(&self, id: ShopId) -> Result<Shop, CatalogError> {
        self.shops
            .get(id)
            .await
            .map_err(CatalogError::Repository)?
            .ok_or(CatalogError::NotFound)
    }

    /// Create a new shop. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Denied` if the caller is not an admin.
    /// Returns `CatalogError::Validation` if any field is blank.
    /// Returns `CatalogError::Repository` for database errors.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        name: &str,
        address: &str,
        city: &str,
    ) -> Result<ShopId, CatalogError> {
        authorize(principal, Role::Admin)?;
        let draft = validate_shop(name, address, city)?;

        self.shops
            .create(&draft)
            .await
            .map_err(CatalogError::Repository)
    }

    /// Update an existing shop. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Denied` if the caller is not an admin.
    /// Returns `CatalogError::Validation` if any field is blank.
    /// Returns `CatalogError::NotFound` if no shop has the given id.
    /// Returns `CatalogError::Repository` for database errors.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: ShopId,
        name: &str,
        address: &str,
        city: &str,
    ) -> Result<(), CatalogError> {
        authorize(principal, Role::Admin)?;
        let draft = validate_shop(name, address, city)?;

        self.shops.update(id, &draft).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound,
            other => CatalogError::Repository(other),
        })
    }

    /// Delete a shop with no reviews. Admin only.
    ///
    /// Deletion is restricted, not cascading: a shop that still has
    /// reviews is reported as `HasReviews` and left untouched, so review
    /// history cannot disappear through a catalog edit.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Denied` if the caller is not an admin.
    /// Returns `CatalogError::HasReviews` if reviews still reference the shop.
    /// Returns `CatalogError::NotFound` if no shop has the given id.
    /// Returns `CatalogError::Repository` for database errors.
    pub async fn delete(
        &self,
        principal: Option<&Principal>,
        id: ShopId,
    ) -> Result<(), CatalogError> {
        authorize(principal, Role::Admin)?;

        self.shops.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound,
            RepositoryError::Conflict(_) => CatalogError::HasReviews,
            other => CatalogError::Repository(other),
        })
    }
}

/// Trim and validate shop fields.
///
/// Matches the registration flow's shape: one `ValidationError` carrying
/// the full report, no write on failure.
fn validate_shop<'a>(
    name: &'a str,
    address: &'a str,
    city: &'a str,
) -> Result<ShopDraft<'a>, ValidationError> {
    let name = name.trim();
    let address = address.trim();
    let city = city.trim();

    if name.is_empty() || address.is_empty() || city.is_empty() {
        return Err(ValidationError::new(vec![
            "All fields are required".to_owned(),
        ]));
    }

    Ok(ShopDraft {
        name,
        address,
        city,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_shop_trims_fields() {
        let draft = validate_shop("  Corner Shop ", " 1 High St ", " Leeds  ").unwrap();
        assert_eq!(draft.name, "Corner Shop");
        assert_eq!(draft.address, "1 High St");
        assert_eq!(draft.city, "Leeds");
    }

    #[test]
    fn test_validate_shop_rejects_blank_city() {
        let err = validate_shop("Corner Shop", "1 High St", "   ").unwrap_err();
        assert_eq!(err.reasons, vec!["All fields are required".to_owned()]);
    }

    #[test]
    fn test_validate_shop_rejects_all_blank() {
        assert!(validate_shop("", "", "").is_err());
    }
}
