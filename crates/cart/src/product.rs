//! Product sources: turning an "add to cart" trigger into a [`Product`].

use cheesecake_cart_core::{DEFAULT_CURRENCY_GLYPH, Price, Product, ProductId};

use crate::error::ProductReadError;

/// Resolves whatever the UI hands over on "add to cart" into a product.
pub trait ProductReader {
    /// The reference the UI passes in (a card, a row, a product itself).
    type Source: ?Sized;

    /// Extract the product.
    ///
    /// # Errors
    ///
    /// Returns `ProductReadError` if the source lacks a field or holds an
    /// unparseable id or price.
    fn read(&self, source: &Self::Source) -> Result<Product, ProductReadError>;
}

/// Raw text of a product card in the listing.
///
/// Fields are exactly what the listing shows: the price is a label such as
/// `"450₽"`, not a number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl ProductCard {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            image: image.into(),
        }
    }
}

/// Reads [`ProductCard`]s, parsing the price label.
///
/// Labels may carry the configured currency glyph or the rouble sign.
#[derive(Debug, Clone)]
pub struct CardReader {
    glyph: String,
}

impl CardReader {
    #[must_use]
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
        }
    }
}

impl Default for CardReader {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_GLYPH)
    }
}

impl ProductReader for CardReader {
    type Source = ProductCard;

    fn read(&self, card: &ProductCard) -> Result<Product, ProductReadError> {
        let name = card.name.trim();
        if name.is_empty() {
            return Err(ProductReadError::MissingField("name"));
        }

        Ok(Product {
            id: ProductId::parse(card.id.trim())?,
            name: name.to_owned(),
            unit_price: Price::parse_label_with(&card.price, &self.glyph)?,
            image_ref: card.image.clone(),
        })
    }
}

/// Passes already-typed products straight through.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectReader;

impl ProductReader for DirectReader {
    type Source = Product;

    fn read(&self, product: &Product) -> Result<Product, ProductReadError> {
        Ok(product.clone())
    }
}
