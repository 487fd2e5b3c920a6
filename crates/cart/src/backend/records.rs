//! Wire records and boundary normalization.
//!
//! The backend's field naming is inconsistent across collaborators
//! (`BookTitle` vs `title`, `Price` vs `price`, Mongo-style `_id`). All of it
//! is normalized here into the canonical [`CartItem`] shape; downstream logic
//! never branches on raw field presence.

use rust_decimal::Decimal;
use serde::Deserialize;

use bookstack_core::ItemId;

use crate::store::CartItem;

/// One cart record as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct CartRecord {
    /// Server-assigned identifier; absent on records that never
    /// round-tripped through the backend.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<ItemId>,
    /// Book title, the key within the cart.
    #[serde(alias = "BookTitle")]
    pub title: String,
    /// Book author.
    #[serde(alias = "Author")]
    pub author: String,
    /// Unit price as a plain JSON number.
    #[serde(alias = "Price")]
    pub price: Decimal,
    /// Cover image reference.
    #[serde(alias = "BookImage", default)]
    pub image: Option<String>,
    /// Quantity; the backend omits it for single-copy records.
    #[serde(default = "default_count")]
    pub count: u32,
}

const fn default_count() -> u32 {
    1
}

impl From<CartRecord> for CartItem {
    fn from(record: CartRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            price: record.price,
            image: record.image,
            // A stored zero-quantity item violates the store invariant, so a
            // zero count normalizes to one like an absent count does.
            quantity: record.count.max(1),
        }
    }
}
