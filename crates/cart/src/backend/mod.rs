//! Backend cart service client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for cart membership; the store only
//!   mutates after the backend confirms a removal
//! - REST/JSON over `reqwest`, one shared `Client` behind an `Arc`
//! - [`CartBackend`] is the seam the session is generic over, so tests run
//!   against an in-memory implementation instead of a live server
//!
//! # Endpoints
//!
//! - `GET {base}/cart/{key}` - array of cart records
//! - `DELETE {base}/cart/remove/{id}` - 2xx on success, JSON `{message}` on
//!   failure

mod records;

pub use records::CartRecord;

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use bookstack_core::{CartKey, ItemId};

use crate::config::CartConfig;

/// Errors that can occur when talking to the backend cart service.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided `{message}` body, when one could be decoded.
        message: Option<String>,
    },

    /// A success response body failed to decode.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error body shape the backend uses for failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// The backend operations the cart session depends on.
///
/// Exactly the two calls the subsystem makes: the initial read and the
/// removal write. Everything else stays local.
pub trait CartBackend {
    /// Fetch the full cart stored under `key`.
    fn fetch_cart(
        &self,
        key: &CartKey,
    ) -> impl Future<Output = Result<Vec<CartRecord>, BackendError>> + Send;

    /// Delete the item with server identifier `id`.
    fn remove_item(&self, id: &ItemId) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// REST client for the backend cart service.
///
/// Cheaply cloneable; all clones share one `reqwest::Client`.
#[derive(Clone)]
pub struct CartServiceClient {
    inner: Arc<CartServiceClientInner>,
}

struct CartServiceClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CartServiceClient {
    /// Create a new backend client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &CartConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CartServiceClientInner {
                client,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    #[instrument(skip(self))]
    async fn get_cart(&self, key: &CartKey) -> Result<Vec<CartRecord>, BackendError> {
        let url = format!("{}/cart/{}", self.inner.base_url, key);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = %status, "cart fetch rejected by backend");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: decode_error_message(&text),
            });
        }

        let records: Vec<CartRecord> = serde_json::from_str(&text)?;
        debug!(count = records.len(), "fetched cart records");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn delete_item(&self, id: &ItemId) -> Result<(), BackendError> {
        let url = format!("{}/cart/remove/{}", self.inner.base_url, id);
        let response = self.inner.client.delete(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            tracing::warn!(status = %status, item_id = %id, "item removal rejected by backend");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: decode_error_message(&text),
            });
        }

        debug!(item_id = %id, "item removed server-side");
        Ok(())
    }
}

impl CartBackend for CartServiceClient {
    async fn fetch_cart(&self, key: &CartKey) -> Result<Vec<CartRecord>, BackendError> {
        self.get_cart(key).await
    }

    async fn remove_item(&self, id: &ItemId) -> Result<(), BackendError> {
        self.delete_item(id).await
    }
}

/// Pull the `{message}` out of a failure body, tolerating non-JSON bodies.
fn decode_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message_json() {
        assert_eq!(
            decode_error_message(r#"{"message":"Item not found"}"#),
            Some("Item not found".to_owned())
        );
    }

    #[test]
    fn test_decode_error_message_non_json() {
        assert_eq!(decode_error_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(decode_error_message(""), None);
    }

    #[test]
    fn test_status_error_display() {
        let err = BackendError::Status {
            status: 404,
            message: Some("Cart not found".to_owned()),
        };
        assert_eq!(err.to_string(), "backend returned status 404: Cart not found");

        let err = BackendError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "backend returned status 500");
    }
}
