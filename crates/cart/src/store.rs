//! In-memory cart store and lifecycle state.
//!
//! The store is the authoritative line-item list for the session. It is
//! owned exclusively by the session controller; nothing mutates it without
//! going through an operation that returns a fresh totals snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookstack_core::ItemId;

/// One line item in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server-assigned identifier, required for removal.
    pub id: Option<ItemId>,
    /// Book title; the key within the cart.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Unit price.
    pub price: Decimal,
    /// Cover image reference.
    pub image: Option<String>,
    /// Quantity; at least 1 while the item is present.
    pub quantity: u32,
}

impl CartItem {
    /// Price for the full line: unit price times quantity.
    ///
    /// Always derived from the current fields, never cached.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart lifecycle state.
///
/// `Loading -> Ready` on a successful load, `Loading -> LoadFailed` on a
/// failed one (terminal until a new load is triggered). A failed removal
/// never leaves `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No load has resolved yet; quantity and removal operations are not
    /// permitted.
    Loading,
    /// A load resolved successfully; the store is authoritative.
    Ready,
    /// The initial fetch failed; the store is empty.
    LoadFailed,
}

/// In-memory authoritative list of line items for the session.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartItem>,
    lifecycle: Lifecycle,
    generation: u64,
}

impl CartStore {
    /// Create an empty store in the `Loading` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            lifecycle: Lifecycle::Loading,
            generation: 0,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether the store has resolved a successful load.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready)
    }

    /// The current line items, in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Wholesale-replace generation counter.
    ///
    /// Bumped every time the store is replaced or invalidated; an async
    /// operation that captured an earlier generation must discard its result
    /// instead of applying it to the new store.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the store wholesale with freshly loaded items.
    ///
    /// Local edits made since the previous load are overwritten by server
    /// state; quantity edits are intentionally ephemeral.
    pub fn replace(&mut self, items: Vec<CartItem>) {
        self.items = items;
        self.lifecycle = Lifecycle::Ready;
        self.generation += 1;
    }

    /// Record a failed load: the store empties and stays unusable until a
    /// new load resolves.
    pub fn mark_load_failed(&mut self) {
        self.items.clear();
        self.lifecycle = Lifecycle::LoadFailed;
        self.generation += 1;
    }

    /// Find an item by title. First match wins when titles collide.
    #[must_use]
    pub fn find(&self, title: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.title == title)
    }

    /// Title of the first item, if any.
    #[must_use]
    pub fn first_title(&self) -> Option<&str> {
        self.items.first().map(|item| item.title.as_str())
    }

    /// Set the quantity of the first item matching `title`.
    ///
    /// Returns `true` if an item was updated. Callers must route a zero
    /// quantity through removal instead; a zero-quantity item is never
    /// stored.
    pub fn set_quantity(&mut self, title: &str, quantity: u32) -> bool {
        debug_assert!(quantity >= 1, "zero quantity must go through removal");
        match self.items.iter_mut().find(|item| item.title == title) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the first item matching `title`, returning it.
    pub fn remove_by_title(&mut self, title: &str) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.title == title)?;
        Some(self.items.remove(position))
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(title: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: Some(ItemId::from(format!("id-{title}").as_str())),
            title: title.to_owned(),
            author: "Author".to_owned(),
            price: Decimal::from(price),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_starts_loading_and_empty() {
        let store = CartStore::new();
        assert_eq!(store.lifecycle(), Lifecycle::Loading);
        assert!(store.is_empty());
        assert!(!store.is_ready());
    }

    #[test]
    fn test_replace_moves_to_ready_and_bumps_generation() {
        let mut store = CartStore::new();
        let before = store.generation();
        store.replace(vec![item("A", 100, 2)]);
        assert_eq!(store.lifecycle(), Lifecycle::Ready);
        assert_eq!(store.len(), 1);
        assert!(store.generation() > before);
    }

    #[test]
    fn test_mark_load_failed_empties_store() {
        let mut store = CartStore::new();
        store.replace(vec![item("A", 100, 2)]);
        store.mark_load_failed();
        assert_eq!(store.lifecycle(), Lifecycle::LoadFailed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_line_total() {
        let item = item("A", 100, 3);
        assert_eq!(item.line_total(), Decimal::from(300));
    }

    #[test]
    fn test_set_quantity_updates_first_match() {
        let mut store = CartStore::new();
        store.replace(vec![item("A", 100, 1), item("A", 50, 1)]);
        assert!(store.set_quantity("A", 4));
        assert_eq!(store.items()[0].quantity, 4);
        assert_eq!(store.items()[1].quantity, 1);
    }

    #[test]
    fn test_set_quantity_unknown_title() {
        let mut store = CartStore::new();
        store.replace(vec![item("A", 100, 1)]);
        assert!(!store.set_quantity("B", 2));
    }

    #[test]
    fn test_remove_by_title_preserves_order() {
        let mut store = CartStore::new();
        store.replace(vec![item("A", 100, 1), item("B", 50, 1), item("C", 25, 1)]);
        let removed = store.remove_by_title("B").unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(store.first_title(), Some("A"));
        assert_eq!(store.items()[1].title, "C");
    }

    #[test]
    fn test_remove_absent_title_is_none() {
        let mut store = CartStore::new();
        store.replace(vec![item("A", 100, 1)]);
        assert!(store.remove_by_title("Z").is_none());
        assert_eq!(store.len(), 1);
    }
}
