//! Plain-text rendering of the cart widget.

use std::io::{self, Write};

use cheesecake_cart::view::CartView;

/// Write the cart: badge line, one row per item, then the total.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn cart<W: Write>(out: &mut W, view: &CartView) -> io::Result<()> {
    if !view.badge_visible {
        writeln!(out, "Cart is empty")?;
        return writeln!(out, "Total: {}", view.total);
    }

    writeln!(out, "Cart ({})", view.item_count)?;
    for item in &view.items {
        writeln!(
            out,
            "  {qty} x {title} [{id}]  {price}  {line}",
            qty = item.quantity,
            title = item.title,
            id = item.id,
            price = item.price,
            line = item.line_price,
        )?;
    }
    writeln!(out, "Total: {}", view.total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cheesecake_cart::view::CartItemView;

    use super::*;

    #[test]
    fn test_render_empty() {
        let mut out = Vec::new();
        cart(&mut out, &CartView::empty("₽")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cart is empty\nTotal: 0.00₽\n"
        );
    }

    #[test]
    fn test_render_items() {
        let view = CartView {
            items: vec![CartItemView {
                id: "cheesecake-1".to_string(),
                title: "Classic".to_string(),
                quantity: 2,
                price: "450.00₽".to_string(),
                line_price: "900.00₽".to_string(),
                image: String::new(),
            }],
            subtotal: "900.00₽".to_string(),
            total: "900.00₽".to_string(),
            item_count: 2,
            badge_visible: true,
        };

        let mut out = Vec::new();
        cart(&mut out, &view).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cart (2)\n  2 x Classic [cheesecake-1]  450.00₽  900.00₽\nTotal: 900.00₽\n"
        );
    }
}
