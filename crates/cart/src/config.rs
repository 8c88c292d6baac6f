//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Storage slot the cart is saved under (default: `cart`)
//! - `CART_STORAGE_DIR` - Directory for file-backed storage (default: `.cart`)
//! - `CART_CURRENCY_GLYPH` - Suffix shown after amounts (default: `₽`)

use std::path::PathBuf;

use cheesecake_cart_core::DEFAULT_CURRENCY_GLYPH;
use thiserror::Error;

use crate::storage::{DEFAULT_CART_KEY, is_valid_key};

const MAX_GLYPH_CHARS: usize = 8;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key of the storage slot holding the cart
    pub storage_key: String,
    /// Directory used by file-backed storage
    pub storage_dir: PathBuf,
    /// Currency glyph appended to formatted amounts
    pub currency_glyph: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_KEY.to_string(),
            storage_dir: PathBuf::from(".cart"),
            currency_glyph: DEFAULT_CURRENCY_GLYPH.to_string(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_key = lookup("CART_STORAGE_KEY").unwrap_or(defaults.storage_key);
        validate_storage_key(&storage_key)?;

        let storage_dir = lookup("CART_STORAGE_DIR").map_or(defaults.storage_dir, PathBuf::from);
        if storage_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_DIR".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let currency_glyph = lookup("CART_CURRENCY_GLYPH").unwrap_or(defaults.currency_glyph);
        if currency_glyph.chars().count() > MAX_GLYPH_CHARS {
            return Err(ConfigError::InvalidEnvVar(
                "CART_CURRENCY_GLYPH".to_string(),
                format!("must be at most {MAX_GLYPH_CHARS} characters"),
            ));
        }

        Ok(Self {
            storage_key,
            storage_dir,
            currency_glyph,
        })
    }
}

/// Storage keys double as file names for file-backed storage.
fn validate_storage_key(key: &str) -> Result<(), ConfigError> {
    if !is_valid_key(key) {
        return Err(ConfigError::InvalidEnvVar(
            "CART_STORAGE_KEY".to_string(),
            format!("'{key}' must be non-empty and use only letters, digits, '-', '_' or '.'"),
        ));
    }
    Ok(())
}
