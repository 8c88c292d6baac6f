//! The cart store: the only owner and mutator of the cart.
//!
//! Every mutation takes `&mut self` and saves before returning, so a second
//! mutation cannot start until the first one, including its write, is done.
//! Storage failures never roll back the in-memory change.

use tracing::instrument;

use cheesecake_cart_core::Product;

use crate::cart::{Cart, CartSnapshot};
use crate::error::{PersistenceReadError, PersistenceWriteError};
use crate::storage::KeyValueStorage;

/// What happened to persistence after a mutation.
///
/// The mutation itself always succeeds; this only reports the save.
#[derive(Debug)]
#[must_use]
pub enum SaveOutcome {
    /// The cart was written to storage.
    Saved,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The cart changed in memory but could not be written.
    Failed(PersistenceWriteError),
}

impl SaveOutcome {
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// The write error, if the save failed.
    #[must_use]
    pub const fn error(&self) -> Option<&PersistenceWriteError> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Saved | Self::Unchanged => None,
        }
    }
}

/// Owns the [`Cart`] and the storage slot it is persisted to.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Create a store over `storage` and hydrate it from the slot at `key`.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            cart: Cart::default(),
            storage,
            key: key.into(),
        };
        store.load();
        store
    }

    /// Replace the in-memory cart with the saved one.
    ///
    /// An empty slot, a storage read error, or a malformed value all yield an
    /// empty cart. Read errors are logged, never returned.
    pub fn load(&mut self) {
        self.cart = match self.read_saved() {
            Ok(Some(cart)) => {
                tracing::debug!(
                    key = %self.key,
                    items = cart.items().len(),
                    "Loaded saved cart"
                );
                cart
            }
            Ok(None) => Cart::default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable saved cart");
                Cart::default()
            }
        };
    }

    fn read_saved(&self) -> Result<Option<Cart>, PersistenceReadError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Write the current cart to storage.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceWriteError` if serialization or the storage write fails.
    pub fn save(&mut self) -> Result<(), PersistenceWriteError> {
        let json = serde_json::to_string(&self.cart)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }

    /// Add one unit of `product`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: Product) -> SaveOutcome {
        self.cart.add(product);
        tracing::debug!(item_count = self.cart.item_count(), "Added item");
        self.persist()
    }

    /// Change an item's quantity by `delta`; at zero or below it is removed.
    ///
    /// An unknown `id` is silently ignored and nothing is saved.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: &str, delta: i64) -> SaveOutcome {
        if !self.cart.update_quantity(id, delta) {
            tracing::debug!("Quantity change for item not in cart ignored");
            return SaveOutcome::Unchanged;
        }
        tracing::debug!(item_count = self.cart.item_count(), "Updated quantity");
        self.persist()
    }

    /// Remove the item with `id`. Removing an absent item changes nothing
    /// but still re-saves the cart.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &str) -> SaveOutcome {
        let removed = self.cart.remove(id);
        tracing::debug!(removed, item_count = self.cart.item_count(), "Removed item");
        self.persist()
    }

    /// An owned, read-only copy of the cart.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and hand back its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> SaveOutcome {
        match self.save() {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Cart changed but could not be saved");
                SaveOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use cheesecake_cart_core::{Price, ProductId};
    use mockall::predicate::eq;
    use proptest::prelude::*;

    use super::*;
    use crate::cart::CartItem;
    use crate::error::StorageError;
    use crate::storage::{MemoryStorage, MockKeyValueStorage};

    fn product(id: &str, minor_units: u32) -> Product {
        Product::new(
            ProductId::parse(id).unwrap(),
            format!("Cheesecake {id}"),
            Price::from_minor_units(minor_units),
            format!("/img/{id}.jpg"),
        )
    }

    fn empty_store() -> CartStore<MemoryStorage> {
        CartStore::open(MemoryStorage::new(), "cart")
    }

    #[test]
    fn test_open_empty_slot() {
        let store = empty_store();
        let snapshot = store.snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.subtotal(), Price::ZERO);
        assert_eq!(snapshot.tax(), Price::ZERO);
        assert_eq!(snapshot.total(), Price::ZERO);
    }

    #[test]
    fn test_add_item_saves() {
        let mut store = empty_store();
        assert!(store.add_item(product("a", 100)).is_saved());

        let raw = store.storage().get("cart").unwrap().unwrap();
        assert!(raw.contains("\"id\":\"a\""));
    }

    #[test]
    fn test_update_quantity_unknown_id_does_not_save() {
        let mut storage = MockKeyValueStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().never();

        let mut store = CartStore::open(storage, "cart");
        assert!(store.update_quantity("ghost", 1).is_unchanged());
    }

    #[test]
    fn test_remove_unknown_id_still_saves() {
        let mut storage = MockKeyValueStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .with(eq("cart"), eq(r#"{"items":[],"subtotal":"0","tax":"0","total":"0"}"#))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut store = CartStore::open(storage, "cart");
        assert!(store.remove_item("ghost").is_saved());
    }

    #[test]
    fn test_write_failure_keeps_mutation() {
        let mut store = CartStore::open(MemoryStorage::with_quota(10), "cart");

        let outcome = store.add_item(product("a", 100));
        assert!(matches!(
            outcome.error(),
            Some(PersistenceWriteError::Write(StorageError::QuotaExceeded { .. }))
        ));
        assert_eq!(store.snapshot().item_count(), 1);
    }

    #[test]
    fn test_read_failure_starts_empty() {
        let mut storage = MockKeyValueStorage::new();
        storage.expect_get().returning(|key| {
            Err(StorageError::Io {
                key: key.to_owned(),
                source: std::io::Error::other("disk on fire"),
            })
        });

        let store = CartStore::open(storage, "cart");
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_corrupt_value_starts_empty() {
        for corrupt in ["not json", "{", "[]", "null", r#"{"items":"nope"}"#, ""] {
            let storage = MemoryStorage::new().with_value("cart", corrupt);
            let store = CartStore::open(storage, "cart");
            assert!(store.snapshot().is_empty(), "{corrupt:?} should load empty");
        }
    }

    #[test]
    fn test_overflowing_saved_cart_starts_empty() {
        let saved = r#"{"items":[{"id":"a","name":"A","price":"79228162514264337593543950335","image":"","quantity":2}]}"#;
        let store = CartStore::open(MemoryStorage::new().with_value("cart", saved), "cart");
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_add_huge_price_twice_does_not_panic() {
        let mut store = empty_store();
        let max = Price::new(rust_decimal::Decimal::MAX).unwrap();
        let huge = Product::new(ProductId::parse("a").unwrap(), "A", max, "");

        assert!(store.add_item(huge.clone()).is_saved());
        assert!(store.add_item(huge).is_saved());
        assert_eq!(store.snapshot().total(), max);
    }

    #[test]
    fn test_load_uses_configured_key() {
        let mut first = CartStore::open(MemoryStorage::new(), "cart-a");
        let _ = first.add_item(product("a", 100));

        let second = CartStore::open(first.into_storage(), "cart-b");
        assert!(second.snapshot().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut store = empty_store();
        let _ = store.add_item(product("b", 250));
        let _ = store.add_item(product("a", 100));
        let _ = store.add_item(product("b", 250));
        let expected = store.snapshot();

        let reloaded = CartStore::open(store.into_storage(), "cart");
        assert_eq!(reloaded.snapshot(), expected);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Update(usize, i64),
        Remove(usize),
    }

    const IDS: [&str; 4] = ["cheesecake-1", "cheesecake-2", "tiramisu", "napoleon"];
    const PRICES: [u32; 4] = [45_000, 52_050, 10, 0];

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..IDS.len()).prop_map(Op::Add),
            ((0..IDS.len()), -3i64..=3).prop_map(|(i, d)| Op::Update(i, d)),
            (0..IDS.len()).prop_map(Op::Remove),
        ]
    }

    fn assert_invariants(items: &[CartItem], subtotal: Price, total: Price) {
        let expected: Price = items
            .iter()
            .map(|i| i.unit_price().times(i.quantity()))
            .sum();
        assert_eq!(subtotal, expected);
        assert_eq!(total, subtotal);
        assert!(items.iter().all(|i| i.quantity() >= 1));

        let mut ids: Vec<_> = items.iter().map(|i| i.id().as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Subtotal, quantity and uniqueness invariants hold after every operation.
        #[test]
        fn prop_invariants_hold_after_every_op(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut store = empty_store();
            for op in ops {
                let _ = match op {
                    Op::Add(i) => store.add_item(product(IDS[i], PRICES[i])),
                    Op::Update(i, d) => store.update_quantity(IDS[i], d),
                    Op::Remove(i) => store.remove_item(IDS[i]),
                };
                let s = store.snapshot();
                assert_invariants(s.items(), s.subtotal(), s.total());
            }
        }

        /// Adding distinct ids yields one line per id, quantity = times added.
        #[test]
        fn prop_add_counts(adds in prop::collection::vec(0..IDS.len(), 0..30)) {
            let mut store = empty_store();
            for &i in &adds {
                let _ = store.add_item(product(IDS[i], PRICES[i]));
            }

            let snapshot = store.snapshot();
            let mut distinct = adds.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(snapshot.items().len(), distinct.len());

            for i in distinct {
                let added = adds.iter().filter(|&&a| a == i).count();
                let item = snapshot.item(IDS[i]).unwrap();
                prop_assert_eq!(item.quantity() as usize, added);
            }
        }

        /// Decrementing by the full quantity removes the item.
        #[test]
        fn prop_removal_by_zero(times in 1u32..10) {
            let mut store = empty_store();
            for _ in 0..times {
                let _ = store.add_item(product("a", 100));
            }
            let _ = store.add_item(product("b", 100));

            let _ = store.update_quantity("a", -i64::from(times));
            prop_assert!(store.snapshot().item("a").is_none());
            prop_assert_eq!(store.snapshot().item_count(), 1);
        }

        /// A reload reproduces the same items, order and quantities.
        #[test]
        fn prop_save_load_round_trip(ops in prop::collection::vec(arb_op(), 0..30)) {
            let mut store = empty_store();
            for op in ops {
                let _ = match op {
                    Op::Add(i) => store.add_item(product(IDS[i], PRICES[i])),
                    Op::Update(i, d) => store.update_quantity(IDS[i], d),
                    Op::Remove(i) => store.remove_item(IDS[i]),
                };
            }
            let _ = store.save();
            let expected = store.snapshot();

            let reloaded = CartStore::open(store.into_storage(), "cart");
            prop_assert_eq!(reloaded.snapshot(), expected);
        }
    }
}
