//! Cart lookup key derived from a user's email.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::email::Email;

/// The domain suffix the backend strips when keying carts.
///
/// Carts were historically keyed by the bare local part of gmail addresses,
/// so `reader@gmail.com` and a bare `reader` resolve to the same cart.
/// Non-gmail addresses are keyed by the full address.
const STRIPPED_SUFFIX: &str = "@gmail.com";

/// Errors that can occur when deriving a [`CartKey`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CartKeyError {
    /// No usable identity was available.
    #[error("no identity available to derive a cart key")]
    Missing,
}

/// The identity key a user's server-held cart is stored under.
///
/// Derived from the user's email by stripping a known domain suffix
/// (case-insensitive). The derivation is lossy and exists to match the
/// backend's keying scheme, not to validate the email.
///
/// ## Examples
///
/// ```
/// use bookstack_core::CartKey;
///
/// let key = CartKey::derive("reader@gmail.com").unwrap();
/// assert_eq!(key.as_str(), "reader");
///
/// let key = CartKey::derive("reader@example.com").unwrap();
/// assert_eq!(key.as_str(), "reader@example.com");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CartKey(String);

impl CartKey {
    /// Derive a cart key from a raw email string.
    ///
    /// Strips a trailing `@gmail.com` (any case); everything else passes
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartKeyError::Missing`] when the input (or what remains of
    /// it after stripping) is empty.
    pub fn derive(raw_email: &str) -> Result<Self, CartKeyError> {
        let stripped = strip_suffix_ignore_case(raw_email, STRIPPED_SUFFIX);
        if stripped.is_empty() {
            return Err(CartKeyError::Missing);
        }
        Ok(Self(stripped.to_owned()))
    }

    /// Derive a cart key from a validated [`Email`].
    ///
    /// # Errors
    ///
    /// Returns [`CartKeyError::Missing`] when the derived key would be empty.
    pub fn from_email(email: &Email) -> Result<Self, CartKeyError> {
        Self::derive(email.as_str())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CartKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> &'a str {
    if s.len() >= suffix.len() {
        let (head, tail) = s.split_at(s.len() - suffix.len());
        if tail.eq_ignore_ascii_case(suffix) {
            return head;
        }
    }
    s
}
