//! Bookstack Cart - cart reconciliation and pricing subsystem.
//!
//! Loads a user's server-held cart, mirrors it into local session state,
//! applies local quantity edits and item removals, computes order totals
//! under the promo-code discount rule, and hands a reconciled snapshot to
//! checkout.
//!
//! # Architecture
//!
//! - [`session::CartSession`] owns the whole flow: one controller per user
//!   session, generic over a [`backend::CartBackend`]
//! - The server cart and the local cart can diverge: quantity edits are
//!   optimistic and local-only, removal is the sole write path back to the
//!   server
//! - Every mutating operation returns a fresh [`pricing::OrderTotals`]
//!   snapshot; totals are never cached across mutations
//! - The [`mirror::SessionStore`] is an explicit, injected session-scoped
//!   state object - no ambient global storage
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstack_cart::{CartConfig, CartServiceClient, CartSession, SessionStore};
//!
//! let config = CartConfig::from_env()?;
//! let backend = CartServiceClient::new(&config)?;
//! let mut cart = CartSession::new(backend, SessionStore::new());
//!
//! let totals = cart.load(Some("reader@gmail.com")).await?;
//! let totals = cart.update_quantity("Dune", 2).await?;
//! let totals = cart.apply_promo("newbook")?;
//! let order = cart.checkout()?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod mirror;
pub mod pricing;
pub mod session;
pub mod store;

pub use backend::{BackendError, CartBackend, CartRecord, CartServiceClient};
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result};
pub use mirror::SessionStore;
pub use pricing::{OrderTotals, PromoState};
pub use session::{CartSession, CheckoutItem, CheckoutOrder};
pub use store::{CartItem, CartStore, Lifecycle};
