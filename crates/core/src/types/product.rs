//! Product data as supplied by a product source.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product offered in the listing.
///
/// This is what an "add to cart" trigger resolves to. The cart copies these
/// fields into a line item; `image_ref` is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(rename = "image")]
    pub image_ref: String,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
        }
    }
}
