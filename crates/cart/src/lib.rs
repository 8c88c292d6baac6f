//! Cheesecake Cart library.
//!
//! The cart keeps a shopper's selected products, their quantities and the
//! running totals, and writes the whole cart to a key-value slot after every
//! change so it survives a reload.
//!
//! # Components
//!
//! - [`store::CartStore`] - owns the [`cart::Cart`] aggregate and every
//!   mutation of it
//! - [`controller::CartController`] - turns UI triggers into store calls and
//!   notifies subscribers with fresh snapshots
//! - [`storage`] - the key-value persistence collaborator
//! - [`view`] - display-ready formatting of a snapshot
//!
//! # Example
//!
//! ```
//! use cheesecake_cart::storage::MemoryStorage;
//! use cheesecake_cart::store::CartStore;
//! use cheesecake_cart_core::{Price, Product, ProductId};
//!
//! let mut store = CartStore::open(MemoryStorage::new(), "cart");
//! let product = Product::new(
//!     ProductId::parse("cheesecake-1").unwrap(),
//!     "New York",
//!     Price::parse_label("450₽").unwrap(),
//!     "/img/new-york.jpg",
//! );
//!
//! let _ = store.add_item(product.clone());
//! let _ = store.add_item(product);
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.item_count(), 2);
//! assert_eq!(snapshot.total().format("₽"), "900.00₽");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod controller;
pub mod error;
pub mod product;
pub mod storage;
pub mod store;
pub mod view;

pub use cart::{Cart, CartItem, CartSnapshot};
pub use controller::{CartController, CartEvent, CheckoutFlow, CheckoutState};
pub use error::{CartError, PersistenceWriteError, ProductReadError, StorageError};
pub use product::{CardReader, DirectReader, ProductCard, ProductReader};
pub use store::{CartStore, SaveOutcome};
