//! Cart session controller.
//!
//! One `CartSession` per user session owns the store, the promo state, and
//! the session-scoped mirror, and is the only thing that mutates them. Every
//! mutating operation returns a fresh totals snapshot; there is no callback
//! propagation from line items to aggregates.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use bookstack_core::CartKey;

use crate::backend::CartBackend;
use crate::error::{CartError, Result};
use crate::mirror::{self, SessionStore};
use crate::pricing::{self, OrderTotals, PromoState};
use crate::store::{CartItem, CartStore};

/// One item of the checkout handoff payload.
///
/// Matches what the checkout collaborator expects: no quantity, no server
/// id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutItem {
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Unit price.
    pub price: Decimal,
    /// Cover image reference.
    pub image: Option<String>,
}

impl From<&CartItem> for CheckoutItem {
    fn from(item: &CartItem) -> Self {
        Self {
            title: item.title.clone(),
            author: item.author.clone(),
            price: item.price,
            image: item.image.clone(),
        }
    }
}

/// The reconciled snapshot handed to the checkout collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOrder {
    /// Item details for the order.
    pub items: Vec<CheckoutItem>,
    /// Final amount due, also written to the mirror's total key.
    pub total: Decimal,
}

/// Cart session controller.
///
/// Generic over the backend so tests can script responses. The store is not
/// considered initialized until [`load`](Self::load) resolves; quantity,
/// removal, and checkout operations are rejected before that.
pub struct CartSession<B> {
    backend: B,
    store: CartStore,
    promo: PromoState,
    session: SessionStore,
    last_error: Option<String>,
}

impl<B: CartBackend> CartSession<B> {
    /// Create a session in the `Loading` state with an injected session
    /// store.
    #[must_use]
    pub const fn new(backend: B, session: SessionStore) -> Self {
        Self {
            backend,
            store: CartStore::new(),
            promo: PromoState::new(),
            session,
            last_error: None,
        }
    }

    /// The injected backend (read-only).
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The underlying store (read-only).
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Current line items, in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.store.items()
    }

    /// The session-scoped mirror state (read-only).
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The most recently surfaced user-facing error, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current totals, recomputed from store and promo state.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        pricing::order_totals(self.store.items(), &self.promo)
    }

    /// Load the cart for `raw_email`, replacing the store wholesale.
    ///
    /// This is the only way into the `Ready` state. On any failure the store
    /// stays empty and unusable until a new load resolves.
    ///
    /// # Errors
    ///
    /// - [`CartError::IdentityMissing`] when no usable email is supplied
    /// - [`CartError::LoadFailed`] when the backend read fails
    #[instrument(skip(self, raw_email))]
    pub async fn load(&mut self, raw_email: Option<&str>) -> Result<OrderTotals> {
        let key = match raw_email.map(CartKey::derive) {
            Some(Ok(key)) => key,
            Some(Err(_)) | None => {
                self.store.mark_load_failed();
                self.sync_mirror();
                return Err(self.surface(CartError::IdentityMissing));
            }
        };

        match self.backend.fetch_cart(&key).await {
            Ok(records) => {
                let items: Vec<CartItem> = records.into_iter().map(CartItem::from).collect();
                debug!(cart_key = %key, items = items.len(), "cart loaded");
                self.store.replace(items);
                self.last_error = None;
                self.sync_mirror();
                Ok(self.totals())
            }
            Err(e) => {
                warn!(cart_key = %key, error = %e, "cart load failed");
                self.store.mark_load_failed();
                self.sync_mirror();
                Err(self.surface(CartError::LoadFailed(e)))
            }
        }
    }

    /// Set the quantity of the item titled `title`.
    ///
    /// A zero quantity delegates to [`remove`](Self::remove). Otherwise this
    /// is a purely local edit: no network call, and a subsequent [`load`]
    /// overwrites it with server state (ephemeral by design). Unknown titles
    /// are a no-op. First match wins when titles collide.
    ///
    /// [`load`]: Self::load
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotLoaded`] before the first load resolves, or a
    /// removal error when `quantity` is zero.
    #[instrument(skip(self))]
    pub async fn update_quantity(&mut self, title: &str, quantity: u32) -> Result<OrderTotals> {
        self.ensure_ready()?;

        if quantity == 0 {
            return self.remove(title).await;
        }

        if self.store.set_quantity(title, quantity) {
            debug!(title, quantity, "quantity updated locally");
            self.sync_mirror();
        } else {
            debug!(title, "quantity update for unknown title ignored");
        }

        Ok(self.totals())
    }

    /// Remove the item titled `title`, server-side first.
    ///
    /// The sole write path back to the server. The store only mutates after
    /// the backend confirms the delete; a failed removal leaves the store
    /// unchanged and is retryable. Removing a title that is no longer
    /// present resolves as a no-op, so a double-submitted removal does not
    /// surface a second error.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotLoaded`] before the first load resolves
    /// - [`CartError::MissingIdentifier`] when the item has no server id
    /// - [`CartError::RemovalFailed`] when the backend rejects the delete
    #[instrument(skip(self))]
    pub async fn remove(&mut self, title: &str) -> Result<OrderTotals> {
        self.ensure_ready()?;

        let item_id = match self.store.find(title) {
            None => {
                debug!(title, "removal of absent item resolved as no-op");
                return Ok(self.totals());
            }
            Some(item) => match &item.id {
                Some(id) => id.clone(),
                None => {
                    return Err(self.surface(CartError::MissingIdentifier {
                        title: title.to_owned(),
                    }));
                }
            },
        };

        let generation = self.store.generation();

        match self.backend.remove_item(&item_id).await {
            Ok(()) => {
                if self.store.generation() != generation {
                    // The store was replaced while the delete was in flight;
                    // the result no longer applies to anything we hold.
                    warn!(title, "store replaced mid-removal; discarding result");
                    return Ok(self.totals());
                }

                self.store.remove_by_title(title);
                self.last_error = None;
                self.sync_mirror();
                debug!(title, item_id = %item_id, "item removed");
                Ok(self.totals())
            }
            Err(e) => {
                warn!(title, item_id = %item_id, error = %e, "item removal failed");
                Err(self.surface(CartError::RemovalFailed(e)))
            }
        }
    }

    /// Apply a promo code, replacing any prior promo state.
    ///
    /// Cart contents are unaffected either way.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPromo`] for non-matching codes; the
    /// discount is deactivated.
    #[instrument(skip(self))]
    pub fn apply_promo(&mut self, code: &str) -> Result<OrderTotals> {
        match self.promo.apply(code) {
            Ok(()) => {
                self.last_error = None;
                Ok(self.totals())
            }
            Err(e) => Err(self.surface(e)),
        }
    }

    /// Hand a reconciled snapshot to the checkout collaborator.
    ///
    /// Writes the final total to the mirror before handing off. Rejected
    /// locally for an empty cart; no network call is issued.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotLoaded`] before the first load resolves
    /// - [`CartError::CheckoutBlocked`] when the cart is empty
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<CheckoutOrder> {
        self.ensure_ready()?;

        if self.store.is_empty() {
            return Err(self.surface(CartError::CheckoutBlocked));
        }

        let totals = self.totals();
        mirror::record_total(&mut self.session, &totals.total);

        Ok(CheckoutOrder {
            items: self.store.items().iter().map(CheckoutItem::from).collect(),
            total: totals.total,
        })
    }

    /// Hard ordering precondition: no quantity/removal/checkout operation
    /// until the initial fetch resolved successfully.
    fn ensure_ready(&mut self) -> Result<()> {
        if self.store.is_ready() {
            Ok(())
        } else {
            Err(self.surface(CartError::NotLoaded))
        }
    }

    /// Record the user-facing message for an error before returning it.
    fn surface(&mut self, err: CartError) -> CartError {
        self.last_error = Some(err.user_message());
        err
    }

    fn sync_mirror(&mut self) {
        mirror::sync(&mut self.session, self.store.items());
    }
}
