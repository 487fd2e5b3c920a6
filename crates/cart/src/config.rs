//! Cart subsystem configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKSTACK_CART_API_URL` - Base URL of the backend cart service
//!   (default: `http://localhost:5000/api`)
//! - `BOOKSTACK_CART_TIMEOUT_SECS` - Request timeout in seconds (default: 10)

use std::time::Duration;

use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart subsystem configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the backend cart service, no trailing slash.
    pub api_base_url: String,
    /// Timeout applied to every backend request.
    pub request_timeout: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid (malformed
    /// URL, non-numeric timeout).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = match std::env::var("BOOKSTACK_CART_API_URL") {
            Ok(raw) => parse_base_url(&raw)?,
            Err(_) => DEFAULT_API_URL.to_owned(),
        };

        let timeout_secs = match std::env::var("BOOKSTACK_CART_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("BOOKSTACK_CART_TIMEOUT_SECS".to_owned(), e.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration pointing at an explicit base URL, defaults elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is malformed.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Validate a base URL and normalize it (no trailing slash).
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("BOOKSTACK_CART_API_URL".to_owned(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BOOKSTACK_CART_API_URL".to_owned(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }

    Ok(raw.trim_end_matches('/').to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_strips_trailing_slash() {
        assert_eq!(
            parse_base_url("http://localhost:5000/api/").unwrap(),
            "http://localhost:5000/api"
        );
    }

    #[test]
    fn test_parse_base_url_accepts_https() {
        assert_eq!(
            parse_base_url("https://cart.bookstack.dev/api").unwrap(),
            "https://cart.bookstack.dev/api"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_base_url_rejects_non_http_scheme() {
        assert!(parse_base_url("ftp://localhost/api").is_err());
    }

    #[test]
    fn test_with_base_url() {
        let config = CartConfig::with_base_url("http://localhost:5000/api").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
