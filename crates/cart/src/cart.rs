//! The cart aggregate and its read-only snapshot.
//!
//! `items` is the only source of truth. Subtotal, tax and total are caches
//! recomputed after every change and again when a saved cart is loaded.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cheesecake_cart_core::{Price, Product, ProductId};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    id: ProductId,
    name: String,
    #[serde(rename = "price")]
    unit_price: Price,
    #[serde(rename = "image")]
    image_ref: String,
    quantity: u32,
}

impl CartItem {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_price: product.unit_price,
            image_ref: product.image_ref,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Reasons a deserialized cart is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCart {
    #[error("item '{0}' has zero quantity")]
    ZeroQuantity(ProductId),

    #[error("item '{0}' appears more than once")]
    DuplicateId(ProductId),

    #[error("cart total exceeds the largest representable amount")]
    Overflow,
}

/// Shape of a saved cart. Only `items` is read back.
#[derive(Deserialize)]
struct StoredCart {
    items: Vec<CartItem>,
}

/// The cart aggregate.
///
/// Mutation is crate-private; everything outside goes through
/// [`CartStore`](crate::store::CartStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredCart")]
pub struct Cart {
    items: Vec<CartItem>,
    subtotal: Price,
    // Always zero: no tax rules exist yet, the field is kept in the saved format.
    tax: Price,
    total: Price,
}

impl TryFrom<StoredCart> for Cart {
    type Error = InvalidCart;

    fn try_from(stored: StoredCart) -> Result<Self, Self::Error> {
        Self::from_items(stored.items)
    }
}

impl Cart {
    /// Rebuild a cart from its items, validating invariants and recomputing totals.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCart` if an item has zero quantity, two items share an
    /// id, or the subtotal does not fit in a `Decimal`.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, InvalidCart> {
        let mut seen = HashSet::with_capacity(items.len());
        let mut subtotal = Price::ZERO;
        for item in &items {
            if item.quantity == 0 {
                return Err(InvalidCart::ZeroQuantity(item.id.clone()));
            }
            if !seen.insert(&item.id) {
                return Err(InvalidCart::DuplicateId(item.id.clone()));
            }
            subtotal = item
                .unit_price
                .checked_times(item.quantity)
                .and_then(|line| subtotal.checked_add(line))
                .ok_or(InvalidCart::Overflow)?;
        }

        let mut cart = Self {
            items,
            ..Self::default()
        };
        cart.recompute_totals();
        Ok(cart)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.subtotal
    }

    #[must_use]
    pub const fn tax(&self) -> Price {
        self.tax
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`, appending a new line if it is not in the cart yet.
    pub(crate) fn add(&mut self, product: Product) {
        if let Some(item) = self.find_mut(product.id.as_str()) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem::from_product(product));
        }
        self.recompute_totals();
    }

    /// Apply `delta` to an item's quantity, removing it at zero or below.
    ///
    /// Returns `false` if no item has that id.
    pub(crate) fn update_quantity(&mut self, id: &str, delta: i64) -> bool {
        let Some(item) = self.find_mut(id) else {
            return false;
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        if next <= 0 {
            self.remove(id);
        } else {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            self.recompute_totals();
        }
        true
    }

    /// Remove the item with `id`. Returns `false` if it was not present.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id.as_str() != id);
        self.recompute_totals();
        self.items.len() != before
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id.as_str() == id)
    }

    fn recompute_totals(&mut self) {
        self.subtotal = self.items.iter().map(CartItem::line_total).sum();
        self.total = self.subtotal + self.tax;
    }

    /// An owned, read-only copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            item_count: self.item_count(),
        }
    }
}

/// Point-in-time copy of the cart for display layers.
///
/// Owns its data, so holding one never observes or blocks later mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    items: Vec<CartItem>,
    subtotal: Price,
    tax: Price,
    total: Price,
    item_count: u64,
}

impl CartSnapshot {
    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.subtotal
    }

    #[must_use]
    pub const fn tax(&self) -> Price {
        self.tax
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Sum of quantities, shown on the cart badge.
    #[must_use]
    pub const fn item_count(&self) -> u64 {
        self.item_count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}
