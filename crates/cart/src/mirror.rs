//! Local mirror of the cart in session-scoped durable state.
//!
//! The mirror preserves the cart and the final total across navigation
//! within one device/session. It is a plain [`SessionStore`] injected into
//! the controller - an explicit get/set/clear surface with one writer and
//! one reader per session, replacing what used to be ambient shared storage.
//!
//! The mirror has no expiry and no protection; it holds personal and pricing
//! data in the clear and must never be handed anything beyond the cart
//! snapshot and totals.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use bookstack_core::format_amount;

use crate::store::CartItem;

/// Durable keys the mirror writes.
pub mod keys {
    /// JSON-encoded snapshot of the full item list.
    pub const CART: &str = "cart";

    /// Title of the first item in the cart.
    pub const BOOK: &str = "book";

    /// Final order total, string-encoded, written at checkout.
    pub const AMT: &str = "amt";
}

/// Session-scoped key/value state.
///
/// One instance per session, owned by the controller and injected into the
/// collaborators that need it. Values are plain strings, matching the
/// durable client storage this models.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value, replacing any prior one.
    pub fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
    }

    /// Remove a key, returning the prior value if present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Clear the whole session.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Synchronize the mirror with the current item list.
///
/// Called on every store change: a non-empty cart persists the full snapshot
/// and the first item's title; an empty cart removes both keys.
pub fn sync(session: &mut SessionStore, items: &[CartItem]) {
    if items.is_empty() {
        session.remove(keys::CART);
        session.remove(keys::BOOK);
        return;
    }

    match serde_json::to_string(items) {
        Ok(snapshot) => session.set(keys::CART, snapshot),
        Err(e) => warn!(error = %e, "failed to encode cart snapshot for mirror"),
    }

    if let Some(item) = items.first() {
        session.set(keys::BOOK, item.title.clone());
    }
}

/// Persist the final total ahead of the checkout handoff.
pub fn record_total(session: &mut SessionStore, total: &Decimal) {
    session.set(keys::AMT, format_amount(total));
}

/// Read back the mirrored item snapshot, if one is present and decodable.
///
/// This is the cross-navigation read side; a corrupt snapshot reads as
/// absent rather than failing the session.
#[must_use]
pub fn cached_items(session: &SessionStore) -> Option<Vec<CartItem>> {
    let snapshot = session.get(keys::CART)?;
    match serde_json::from_str(snapshot) {
        Ok(items) => Some(items),
        Err(e) => {
            warn!(error = %e, "mirror held an undecodable cart snapshot");
            None
        }
    }
}
