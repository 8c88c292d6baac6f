//! Cart controller: UI triggers in, store calls and notifications out.
//!
//! The controller holds no cart state of its own. After each handled
//! mutation it publishes a [`CartEvent::Changed`] with a fresh snapshot to
//! every subscriber, synchronously and in subscription order. Presentation
//! (badge bump, fly-to-cart animation) hangs off that event; state is never
//! held back waiting for it.

use tracing::instrument;

use crate::cart::CartSnapshot;
use crate::error::CartError;
use crate::product::ProductReader;
use crate::storage::KeyValueStorage;
use crate::store::{CartStore, SaveOutcome};

/// Message shown when checkout proceeds.
pub const CHECKOUT_MESSAGE: &str = "Proceeding to checkout...";

/// Notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The cart was mutated; carries the state after the mutation.
    Changed(CartSnapshot),
    /// The mutation applied but could not be saved. Non-blocking.
    PersistenceWarning(String),
}

/// Whether checkout may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Empty,
    NonEmpty,
}

impl CheckoutState {
    #[must_use]
    pub const fn of(snapshot: &CartSnapshot) -> Self {
        if snapshot.item_count() == 0 {
            Self::Empty
        } else {
            Self::NonEmpty
        }
    }
}

/// Receives the "checkout initiated" signal and owns everything after it.
#[cfg_attr(test, mockall::automock)]
pub trait CheckoutFlow {
    fn initiate(&mut self, snapshot: &CartSnapshot);
}

type Subscriber = Box<dyn FnMut(&CartEvent)>;

/// Mediates between UI triggers and the [`CartStore`].
pub struct CartController<S, R, C> {
    store: CartStore<S>,
    reader: R,
    checkout: C,
    subscribers: Vec<Subscriber>,
}

impl<S, R, C> std::fmt::Debug for CartController<S, R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartController")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<S, R, C> CartController<S, R, C>
where
    S: KeyValueStorage,
    R: ProductReader,
    C: CheckoutFlow,
{
    pub fn new(store: CartStore<S>, reader: R, checkout: C) -> Self {
        Self {
            store,
            reader,
            checkout,
            subscribers: Vec::new(),
        }
    }

    /// Register a callback for every subsequent [`CartEvent`].
    pub fn subscribe(&mut self, subscriber: impl FnMut(&CartEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Read the product behind `source` and add one unit of it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductRead` if the product source rejects the
    /// reference; the cart is left untouched and nobody is notified.
    #[instrument(skip_all)]
    pub fn on_add_to_cart(&mut self, source: &R::Source) -> Result<CartSnapshot, CartError> {
        let product = self.reader.read(source).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected add-to-cart");
        })?;
        let outcome = self.store.add_item(product);
        Ok(self.publish(outcome))
    }

    #[instrument(skip(self))]
    pub fn on_quantity_change(&mut self, id: &str, delta: i64) -> CartSnapshot {
        let outcome = self.store.update_quantity(id, delta);
        self.publish(outcome)
    }

    #[instrument(skip(self))]
    pub fn on_remove(&mut self, id: &str) -> CartSnapshot {
        let outcome = self.store.remove_item(id);
        self.publish(outcome)
    }

    /// Signal the checkout flow if the cart has items.
    ///
    /// The cart is not cleared or otherwise changed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartEmpty` when there is nothing to check out.
    #[instrument(skip(self))]
    pub fn on_checkout_requested(&mut self) -> Result<(), CartError> {
        let snapshot = self.store.snapshot();
        match CheckoutState::of(&snapshot) {
            CheckoutState::Empty => {
                tracing::info!("Checkout requested with empty cart");
                Err(CartError::CartEmpty)
            }
            CheckoutState::NonEmpty => {
                tracing::info!(item_count = snapshot.item_count(), "{CHECKOUT_MESSAGE}");
                self.checkout.initiate(&snapshot);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn checkout_state(&self) -> CheckoutState {
        CheckoutState::of(&self.store.snapshot())
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    #[must_use]
    pub const fn checkout(&self) -> &C {
        &self.checkout
    }

    fn publish(&mut self, outcome: SaveOutcome) -> CartSnapshot {
        let snapshot = self.store.snapshot();
        if outcome.is_unchanged() {
            return snapshot;
        }

        self.emit(&CartEvent::Changed(snapshot.clone()));
        if let SaveOutcome::Failed(e) = outcome {
            self.emit(&CartEvent::PersistenceWarning(e.to_string()));
        }
        snapshot
    }

    fn emit(&mut self, event: &CartEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}
