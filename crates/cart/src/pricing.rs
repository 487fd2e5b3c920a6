//! Pricing engine.
//!
//! Pure and stateless: a function from (items, promo state) to totals.
//! Totals are recomputed from current store state on every observation and
//! never cached across mutations.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CartError;
use crate::store::CartItem;

/// The single reserved promo token. Matched case-insensitively.
pub const PROMO_CODE: &str = "NEWBOOK";

/// Delivery is free across the board.
pub const DELIVERY: Decimal = Decimal::ZERO;

/// Fixed discount rate unlocked by the promo code.
fn discount_rate() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

/// Promo-code state for one session.
///
/// Each [`apply`](Self::apply) call fully replaces the prior state; discounts
/// never compound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromoState {
    applied: bool,
}

impl PromoState {
    /// Fresh state with no discount applied.
    #[must_use]
    pub const fn new() -> Self {
        Self { applied: false }
    }

    /// Whether the discount is currently active.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.applied
    }

    /// Apply a promo code.
    ///
    /// A case-insensitive match against [`PROMO_CODE`] activates the
    /// discount; anything else deactivates it, including codes entered after
    /// a successful one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPromo`] for non-matching codes.
    pub fn apply(&mut self, code: &str) -> Result<(), CartError> {
        if code.eq_ignore_ascii_case(PROMO_CODE) {
            self.applied = true;
            Ok(())
        } else {
            self.applied = false;
            Err(CartError::InvalidPromo {
                code: code.to_owned(),
            })
        }
    }
}

/// Order totals snapshot.
///
/// `total = subtotal - discount + delivery` holds in every reachable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    /// Sum of all line totals.
    pub subtotal: Decimal,
    /// Promo discount, half the subtotal when applied.
    pub discount: Decimal,
    /// Delivery charge, pinned at zero.
    pub delivery: Decimal,
    /// Amount due.
    pub total: Decimal,
}

impl OrderTotals {
    /// Totals for an empty cart.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            delivery: DELIVERY,
            total: Decimal::ZERO,
        }
    }
}

/// Compute order totals from the current items and promo state.
#[must_use]
pub fn order_totals(items: &[CartItem], promo: &PromoState) -> OrderTotals {
    let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
    let discount = if promo.is_applied() {
        subtotal * discount_rate()
    } else {
        Decimal::ZERO
    };
    let delivery = DELIVERY;

    OrderTotals {
        subtotal,
        discount,
        delivery,
        total: subtotal - discount + delivery,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bookstack_core::ItemId;

    fn item(title: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: Some(ItemId::from(title)),
            title: title.to_owned(),
            author: "Author".to_owned(),
            price: Decimal::from(price),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let items = vec![item("A", 100, 2), item("B", 50, 1)];
        let totals = order_totals(&items, &PromoState::new());
        assert_eq!(totals.subtotal, Decimal::from(250));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.delivery, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from(250));
    }

    #[test]
    fn test_promo_halves_the_subtotal() {
        let items = vec![item("A", 100, 2), item("B", 50, 1)];
        let mut promo = PromoState::new();
        promo.apply("NEWBOOK").unwrap();

        let totals = order_totals(&items, &promo);
        assert_eq!(totals.subtotal, Decimal::from(250));
        assert_eq!(totals.discount, Decimal::from(125));
        assert_eq!(totals.total, Decimal::from(125));
    }

    #[test]
    fn test_promo_match_is_case_insensitive() {
        let mut promo = PromoState::new();
        assert!(promo.apply("newbook").is_ok());
        assert!(promo.is_applied());

        let mut promo = PromoState::new();
        assert!(promo.apply("NewBook").is_ok());
        assert!(promo.is_applied());
    }

    #[test]
    fn test_invalid_promo_clears_applied_state() {
        let mut promo = PromoState::new();
        promo.apply("NEWBOOK").unwrap();
        assert!(promo.is_applied());

        let err = promo.apply("OLDBOOK").unwrap_err();
        assert!(matches!(err, CartError::InvalidPromo { .. }));
        assert!(!promo.is_applied());
    }

    #[test]
    fn test_repeated_invalid_codes_do_not_compound() {
        let items = vec![item("A", 100, 1)];
        let mut promo = PromoState::new();
        let _ = promo.apply("WRONG");
        let _ = promo.apply("ALSO-WRONG");

        let totals = order_totals(&items, &promo);
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_repeated_valid_codes_do_not_compound() {
        let items = vec![item("A", 100, 1)];
        let mut promo = PromoState::new();
        promo.apply("NEWBOOK").unwrap();
        promo.apply("NEWBOOK").unwrap();

        let totals = order_totals(&items, &promo);
        assert_eq!(totals.discount, Decimal::from(50));
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let totals = order_totals(&[], &PromoState::new());
        assert_eq!(totals, OrderTotals::zero());
    }

    #[test]
    fn test_total_identity_holds_with_fractional_prices() {
        let items = vec![item("A", 99, 3), item("B", 1, 7)];
        let mut promo = PromoState::new();
        promo.apply("NEWBOOK").unwrap();

        let totals = order_totals(&items, &promo);
        assert_eq!(
            totals.total,
            totals.subtotal - totals.discount + totals.delivery
        );
    }
}
