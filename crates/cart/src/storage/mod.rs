//! Key-value persistence for the cart.
//!
//! The cart is saved as one serialized value under one key (`"cart"` by
//! default), mirroring a browser `localStorage` slot. Backends only move
//! strings; serialization lives with the [`Cart`](crate::cart::Cart).

mod file;
mod memory;

pub use file::FileStorage;
pub(crate) use file::is_valid_key;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// Default slot the cart is stored under.
pub const DEFAULT_CART_KEY: &str = "cart";

/// A durable string-to-string slot store.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails (e.g. quota exceeded).
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
