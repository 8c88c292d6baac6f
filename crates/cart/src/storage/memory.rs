//! In-memory storage backend.

use std::collections::HashMap;

use super::KeyValueStorage;
use crate::error::StorageError;

/// `HashMap`-backed storage with an optional per-value size quota.
///
/// Stands in for browser `localStorage` when embedding the cart or testing
/// it; the quota reproduces "quota exceeded" write failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unlimited store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects values longer than `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Seed a slot directly, bypassing the quota.
    #[must_use]
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
                size: value.len(),
                limit,
            });
        }
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
