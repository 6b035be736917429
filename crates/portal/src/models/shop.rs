//! Shop domain types.

use shoprate_core::ShopId;

/// A franchise shop location (domain type).
#[derive(Debug, Clone)]
pub struct Shop {
    /// Unique shop ID.
    pub id: ShopId,
    /// Shop name shown throughout the portal.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City the shop operates in.
    pub city: String,
}
