//! Cheesecake Cart Core - Shared types library.
//!
//! This crate provides the product-level types used by the cart:
//! - `cart` - Cart store, controller and persistence
//! - `cli` - Command-line host for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no presentation. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
