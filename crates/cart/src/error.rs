//! Unified error handling for the cart subsystem.
//!
//! Every operation boundary returns `Result<T, CartError>`. Errors never
//! propagate beyond the subsystem or terminate the session: callers surface
//! [`CartError::user_message`] and the store stays in a consistent state.

use thiserror::Error;

use crate::backend::BackendError;

/// Cart subsystem error taxonomy.
///
/// `Display` is diagnostic; the stable user-facing strings live in
/// [`CartError::user_message`].
#[derive(Debug, Error)]
pub enum CartError {
    /// No usable identity was available to key the cart load.
    ///
    /// Fatal to the load, surfaced once, no retry loop.
    #[error("no user identity available to load a cart")]
    IdentityMissing,

    /// A quantity, removal, or checkout operation was attempted before the
    /// initial load resolved.
    #[error("cart operation attempted before the initial load resolved")]
    NotLoaded,

    /// The initial cart fetch failed; the store stays empty.
    #[error("cart load failed: {0}")]
    LoadFailed(#[source] BackendError),

    /// Removal was requested for an item with no server identifier.
    #[error("cannot remove {title:?}: no server identifier")]
    MissingIdentifier {
        /// Title of the item that could not be removed.
        title: String,
    },

    /// The backend rejected or failed the removal; the store is unchanged.
    #[error("item removal failed: {0}")]
    RemovalFailed(#[source] BackendError),

    /// The promo code did not match the reserved token.
    #[error("invalid promo code: {code:?}")]
    InvalidPromo {
        /// The rejected code.
        code: String,
    },

    /// Checkout was attempted with an empty cart; no network call is issued.
    #[error("checkout attempted with an empty cart")]
    CheckoutBlocked,
}

impl CartError {
    /// The user-facing message for this error.
    ///
    /// These strings are part of the subsystem's contract with the UI and
    /// must not drift.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::IdentityMissing => "User not found. Please login again.".to_owned(),
            Self::NotLoaded => "Cart is still loading. Please wait.".to_owned(),
            Self::LoadFailed(source) => match source {
                BackendError::Status {
                    message: Some(message),
                    ..
                } => message.clone(),
                BackendError::Status { message: None, .. } => {
                    "Failed to fetch cart items".to_owned()
                }
                BackendError::Http(_) | BackendError::Decode(_) => {
                    "An error occurred while fetching the cart data".to_owned()
                }
            },
            Self::MissingIdentifier { .. } => "Cannot remove item: Item ID not found".to_owned(),
            Self::RemovalFailed(source) => match source {
                BackendError::Status {
                    message: Some(message),
                    ..
                } => message.clone(),
                BackendError::Status { message: None, .. } => {
                    "Failed to remove item from cart".to_owned()
                }
                BackendError::Http(_) | BackendError::Decode(_) => {
                    "An error occurred while removing the item".to_owned()
                }
            },
            Self::InvalidPromo { .. } => "Invalid promo code".to_owned(),
            Self::CheckoutBlocked => "Cannot checkout with empty cart".to_owned(),
        }
    }

    /// Whether the user can simply retry the failed operation.
    ///
    /// Removal and promo failures are non-fatal; a failed load needs a new
    /// load to be triggered and a missing identity needs a fresh login.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentifier { .. }
                | Self::RemovalFailed(_)
                | Self::InvalidPromo { .. }
                | Self::CheckoutBlocked
        )
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_missing_message() {
        assert_eq!(
            CartError::IdentityMissing.user_message(),
            "User not found. Please login again."
        );
    }

    #[test]
    fn test_missing_identifier_message() {
        let err = CartError::MissingIdentifier {
            title: "Dune".to_owned(),
        };
        assert_eq!(err.user_message(), "Cannot remove item: Item ID not found");
    }

    #[test]
    fn test_load_failed_prefers_server_message() {
        let err = CartError::LoadFailed(BackendError::Status {
            status: 404,
            message: Some("Cart not found for user".to_owned()),
        });
        assert_eq!(err.user_message(), "Cart not found for user");
    }

    #[test]
    fn test_load_failed_generic_messages() {
        let err = CartError::LoadFailed(BackendError::Status {
            status: 500,
            message: None,
        });
        assert_eq!(err.user_message(), "Failed to fetch cart items");
    }

    #[test]
    fn test_removal_failed_generic_message() {
        let err = CartError::RemovalFailed(BackendError::Status {
            status: 500,
            message: None,
        });
        assert_eq!(err.user_message(), "Failed to remove item from cart");
    }

    #[test]
    fn test_invalid_promo_message() {
        let err = CartError::InvalidPromo {
            code: "OLDBOOK".to_owned(),
        };
        assert_eq!(err.user_message(), "Invalid promo code");
    }

    #[test]
    fn test_checkout_blocked_message() {
        assert_eq!(
            CartError::CheckoutBlocked.user_message(),
            "Cannot checkout with empty cart"
        );
    }

    #[test]
    fn test_retryability() {
        assert!(CartError::CheckoutBlocked.is_retryable());
        assert!(
            CartError::InvalidPromo {
                code: "x".to_owned()
            }
            .is_retryable()
        );
        assert!(!CartError::IdentityMissing.is_retryable());
        assert!(!CartError::NotLoaded.is_retryable());
    }
}
