//! Integration tests for Cheesecake Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cheesecake-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Shopper flows through the controller
//! - `persistence` - Save/load round trips and corrupt-slot recovery
//!
//! This library holds the fixtures shared by those test files.

use std::cell::RefCell;
use std::rc::Rc;

use cheesecake_cart::storage::MemoryStorage;
use cheesecake_cart::{
    CartController, CartEvent, CartSnapshot, CartStore, CheckoutFlow, DirectReader,
};
use cheesecake_cart_core::{Price, Product, ProductId};

/// Controller type used by the scenario tests.
pub type TestController = CartController<MemoryStorage, DirectReader, RecordingCheckout>;

/// Checkout flow that records every snapshot it was handed.
#[derive(Debug, Default)]
pub struct RecordingCheckout {
    pub initiated: Vec<CartSnapshot>,
}

impl CheckoutFlow for RecordingCheckout {
    fn initiate(&mut self, snapshot: &CartSnapshot) {
        self.initiated.push(snapshot.clone());
    }
}

/// Build a product with a price given as a listing label.
///
/// # Panics
///
/// Panics if `id` or `price_label` is invalid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(id: &str, price_label: &str) -> Product {
    Product::new(
        ProductId::parse(id).unwrap(),
        format!("Cheesecake {id}"),
        Price::parse_label(price_label).unwrap(),
        format!("/img/{id}.jpg"),
    )
}

/// The cheesecake from the scenario suite, priced 450.00.
#[must_use]
pub fn cheesecake() -> Product {
    product("cheesecake-1", "450.00₽")
}

/// A controller over `storage` with a recording checkout flow.
#[must_use]
pub fn controller(storage: MemoryStorage) -> TestController {
    CartController::new(
        CartStore::open(storage, "cart"),
        DirectReader,
        RecordingCheckout::default(),
    )
}

/// Subscribe a recorder to `controller` and return its event log.
pub fn record_events(controller: &mut TestController) -> Rc<RefCell<Vec<CartEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    controller.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}
