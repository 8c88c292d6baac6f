//! Core types for Cheesecake Cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::{ProductId, ProductIdError};
pub use price::{DEFAULT_CURRENCY_GLYPH, Price, PriceError};
pub use product::Product;
