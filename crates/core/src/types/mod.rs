//! Core types for Bookstack.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod key;
pub mod price;

pub use email::{Email, EmailError};
pub use id::ItemId;
pub use key::{CartKey, CartKeyError};
pub use price::format_amount;
