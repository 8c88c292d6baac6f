//! Error types for the cart.
//!
//! Only two things can go wrong from a shopper's point of view: checking out
//! an empty cart, and a product card that cannot be read. Storage failures
//! are reported but never undo a mutation, and unreadable saved carts are
//! swallowed into an empty cart.

use thiserror::Error;

use cheesecake_cart_core::{PriceError, ProductIdError};

/// User-facing cart error.
#[derive(Debug, Error)]
pub enum CartError {
    /// Checkout was requested with no items in the cart.
    #[error("Your cart is empty!")]
    CartEmpty,

    /// The add-to-cart trigger did not resolve to a valid product.
    #[error("Could not read product: {0}")]
    ProductRead(#[from] ProductReadError),
}

/// The product source could not produce a product.
#[derive(Debug, Error)]
pub enum ProductReadError {
    #[error("invalid product id: {0}")]
    InvalidId(#[from] ProductIdError),

    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// Key-value storage backend failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O failure reading or writing a slot.
    #[error("I/O error on slot '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The value does not fit in the backend's quota.
    #[error("quota exceeded for slot '{key}': {size} bytes > {limit} bytes")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// The key cannot be used with this backend.
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Failure to persist the cart after a mutation.
///
/// The in-memory cart stays authoritative when this happens.
#[derive(Debug, Error)]
pub enum PersistenceWriteError {
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write cart: {0}")]
    Write(#[from] StorageError),
}

/// Failure to hydrate the cart from storage.
///
/// Never surfaced to the shopper: the store logs it and starts empty.
#[derive(Debug, Error)]
pub enum PersistenceReadError {
    #[error("failed to read saved cart: {0}")]
    Read(#[from] StorageError),

    #[error("saved cart is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
