//! Monetary amount helpers.
//!
//! Prices are carried as [`rust_decimal::Decimal`] end to end; the backend
//! sends them as plain JSON numbers and checkout receives them string-encoded
//! with two decimal places.

use rust_decimal::Decimal;

/// Format a monetary amount with exactly two decimal places.
///
/// This is the canonical rendering used for the mirror's total key and for
/// anything user-facing (e.g. `format_amount(&Decimal::from(125))` is
/// `"125.00"`). Rounds half-up like a till, not banker's rounding.
#[must_use]
pub fn format_amount(amount: &Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    )
}
