//! Cart display data for presentation layers.
//!
//! A snapshot fully determines what the cart widget shows; these views only
//! pre-format it: the badge count and visibility, each line with its unit and
//! line price, and the total with a trailing currency glyph.

use cheesecake_cart_core::DEFAULT_CURRENCY_GLYPH;

use crate::cart::{CartItem, CartSnapshot};

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub total: String,
    pub item_count: u64,
    /// The count badge is hidden while the cart is empty.
    pub badge_visible: bool,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty(glyph: &str) -> Self {
        Self::new(&CartSnapshot::default(), glyph)
    }

    /// Format `snapshot` using `glyph` as the currency suffix.
    #[must_use]
    pub fn new(snapshot: &CartSnapshot, glyph: &str) -> Self {
        Self {
            items: snapshot
                .items()
                .iter()
                .map(|item| CartItemView::new(item, glyph))
                .collect(),
            subtotal: snapshot.subtotal().format(glyph),
            total: snapshot.total().format(glyph),
            item_count: snapshot.item_count(),
            badge_visible: snapshot.item_count() > 0,
        }
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self::new(snapshot, DEFAULT_CURRENCY_GLYPH)
    }
}

impl CartItemView {
    #[must_use]
    pub fn new(item: &CartItem, glyph: &str) -> Self {
        Self {
            id: item.id().to_string(),
            title: item.name().to_owned(),
            quantity: item.quantity(),
            price: item.unit_price().format(glyph),
            line_price: item.line_total().format(glyph),
            image: item.image_ref().to_owned(),
        }
    }
}
