//! Cart commands run against the file-backed storage slot.
//!
//! Each invocation is one page load: the cart is hydrated from storage, one
//! trigger is handled, and the resulting cart is rendered.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use cheesecake_cart::config::CartConfig;
use cheesecake_cart::controller::CHECKOUT_MESSAGE;
use cheesecake_cart::storage::FileStorage;
use cheesecake_cart::view::CartView;
use cheesecake_cart::{
    CardReader, CartController, CartEvent, CartSnapshot, CartStore, CheckoutFlow, ProductCard,
};

use super::{CliError, render};

/// A single shopper trigger.
#[derive(Debug, Clone)]
pub enum Action {
    Show,
    Add(ProductCard),
    ChangeQuantity { id: String, delta: i64 },
    Remove { id: String },
    Checkout,
}

/// Checkout hand-off for the terminal: remembers what was checked out.
#[derive(Debug, Default)]
pub struct ConsoleCheckout {
    initiated: Option<CartSnapshot>,
}

impl ConsoleCheckout {
    #[must_use]
    pub const fn initiated(&self) -> Option<&CartSnapshot> {
        self.initiated.as_ref()
    }
}

impl CheckoutFlow for ConsoleCheckout {
    fn initiate(&mut self, snapshot: &CartSnapshot) {
        self.initiated = Some(snapshot.clone());
    }
}

/// Handle `action` and write the resulting cart to `out`.
///
/// # Errors
///
/// Returns `CliError::Cart` for an unreadable product or an empty-cart
/// checkout, and `CliError::Io` if writing output fails. Storage write
/// failures are reported as warnings, not errors.
pub fn run<W: Write>(action: Action, config: &CartConfig, out: &mut W) -> Result<(), CliError> {
    let storage = FileStorage::new(&config.storage_dir);
    let store = CartStore::open(storage, config.storage_key.clone());
    let mut controller = CartController::new(
        store,
        CardReader::new(config.currency_glyph.clone()),
        ConsoleCheckout::default(),
    );

    let warnings = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&warnings);
    controller.subscribe(move |event| {
        if let CartEvent::PersistenceWarning(message) = event {
            sink.borrow_mut().push(message.clone());
        }
    });

    let snapshot = match action {
        Action::Show => controller.snapshot(),
        Action::Add(card) => controller.on_add_to_cart(&card)?,
        Action::ChangeQuantity { id, delta } => controller.on_quantity_change(&id, delta),
        Action::Remove { id } => controller.on_remove(&id),
        Action::Checkout => {
            controller.on_checkout_requested()?;
            writeln!(out, "{CHECKOUT_MESSAGE}")?;
            if let Some(snapshot) = controller.checkout().initiated() {
                let view = CartView::new(snapshot, &config.currency_glyph);
                render::cart(out, &view)?;
            }
            return Ok(());
        }
    };

    for warning in warnings.borrow().iter() {
        writeln!(out, "warning: cart was not saved: {warning}")?;
    }

    render::cart(out, &CartView::new(&snapshot, &config.currency_glyph))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cheesecake_cart::CartError;

    use super::*;

    fn config(dir: &std::path::Path) -> CartConfig {
        CartConfig {
            storage_dir: dir.to_path_buf(),
            ..CartConfig::default()
        }
    }

    fn run_to_string(action: Action, config: &CartConfig) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(action, config, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn classic() -> Action {
        Action::Add(ProductCard::new(
            "cheesecake-1",
            "Classic",
            "450₽",
            "/img/classic.jpg",
        ))
    }

    #[test]
    fn test_state_survives_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        run_to_string(classic(), &config).unwrap();
        let output = run_to_string(classic(), &config).unwrap();
        assert!(output.contains("Cart (2)"));
        assert!(output.contains("Total: 900.00₽"));

        let output = run_to_string(Action::Show, &config).unwrap();
        assert!(output.contains("2 x Classic [cheesecake-1]"));
    }

    #[test]
    fn test_quantity_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        run_to_string(classic(), &config).unwrap();

        let output = run_to_string(
            Action::ChangeQuantity {
                id: "cheesecake-1".to_string(),
                delta: 2,
            },
            &config,
        )
        .unwrap();
        assert!(output.contains("Total: 1350.00₽"));

        let output = run_to_string(
            Action::Remove {
                id: "cheesecake-1".to_string(),
            },
            &config,
        )
        .unwrap();
        assert!(output.starts_with("Cart is empty"));
    }

    #[test]
    fn test_checkout_empty_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_to_string(Action::Checkout, &config(dir.path())).unwrap_err();
        assert!(matches!(err, CliError::Cart(CartError::CartEmpty)));
        assert_eq!(err.to_string(), "Your cart is empty!");
    }

    #[test]
    fn test_checkout_keeps_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        run_to_string(classic(), &config).unwrap();

        let output = run_to_string(Action::Checkout, &config).unwrap();
        assert!(output.starts_with("Proceeding to checkout..."));

        let output = run_to_string(Action::Show, &config).unwrap();
        assert!(output.contains("Cart (1)"));
    }

    #[test]
    fn test_bad_price_label_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let action = Action::Add(ProductCard::new("a", "A", "n/a", ""));
        let err = run_to_string(action, &config(dir.path())).unwrap_err();
        assert!(matches!(err, CliError::Cart(CartError::ProductRead(_))));
    }
}
