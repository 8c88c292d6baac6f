//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_KEY`, `CART_STORAGE_DIR`, `CART_CURRENCY_GLYPH` - see
//!   [`CartConfig`]
//! - `SENTRY_DSN` - Sentry error tracking DSN (optional)
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (optional)

use cheesecake_cart::config::{CartConfig, ConfigError};

/// CLI application configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Cart storage and display settings
    pub cart: CartConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a cart variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cart = CartConfig::from_env()?;
        Ok(Self {
            cart,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
