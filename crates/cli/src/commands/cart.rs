//! `polished cart` - inspect and edit the persisted cart.

use polished_core::ProductId;
use polished_storefront::cart::{CartState, CartStore};
use polished_storefront::catalog::Catalog;
use polished_storefront::pricing::format_amount;

use super::{CommandError, find_product, render};

/// Render the cart lines and totals.
#[must_use]
pub fn show(cart: &CartState) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_owned();
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|line| {
            format!(
                "{:>3} x {:<28} {:>10}  ({})",
                line.quantity,
                line.product.name,
                format_amount(line.line_total()),
                line.product.id.as_str()
            )
        })
        .collect();

    let summary = cart.summary();
    let totals = summary.totals;
    lines.push(String::new());
    lines.push(format!("Items:    {}", summary.item_count));
    lines.push(format!("Subtotal: {}", format_amount(totals.subtotal)));
    lines.push(format!("Tax:      {}", format_amount(totals.tax)));
    if totals.shipping.is_zero() {
        lines.push("Shipping: Free".to_owned());
    } else {
        lines.push(format!("Shipping: {}", format_amount(totals.shipping)));
    }
    lines.push(format!("Total:    {}", format_amount(totals.total)));
    if let Some(remaining) = summary.free_shipping_remaining {
        lines.push(format!(
            "Add {} more for free shipping.",
            format_amount(remaining)
        ));
    }
    render(&lines)
}

/// Add `quantity` units of a catalog product.
///
/// # Errors
///
/// Returns an error if the product is unknown or `quantity` is zero.
pub fn add(
    cart: &mut CartStore,
    catalog: &Catalog,
    id: &str,
    quantity: u32,
) -> Result<String, CommandError> {
    if quantity == 0 {
        return Err(CommandError::ZeroQuantity);
    }
    let product = find_product(catalog, id)?;
    cart.add_to_cart_quantity(product, quantity);
    Ok(show(cart.state()))
}

/// Set a line's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns [`CommandError::NotInCart`] if the product has no line.
pub fn set(cart: &mut CartStore, id: &str, quantity: i64) -> Result<String, CommandError> {
    let id = ProductId::new(id);
    if !cart.state().contains(&id) {
        return Err(CommandError::NotInCart(id.into_inner()));
    }
    cart.update_quantity(&id, quantity);
    Ok(show(cart.state()))
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns [`CommandError::NotInCart`] if the product has no line.
pub fn remove(cart: &mut CartStore, id: &str) -> Result<String, CommandError> {
    let id = ProductId::new(id);
    if !cart.state().contains(&id) {
        return Err(CommandError::NotInCart(id.into_inner()));
    }
    cart.remove_from_cart(&id);
    Ok(show(cart.state()))
}

/// Empty the cart.
pub fn clear(cart: &mut CartStore) -> String {
    cart.clear_cart();
    show(cart.state())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use polished_storefront::storage::MemoryStorage;

    use super::*;

    fn cart() -> CartStore {
        CartStore::open(Arc::new(MemoryStorage::new()))
    }

    fn first_id(catalog: &Catalog) -> String {
        catalog.all().first().unwrap().id.as_str().to_owned()
    }

    #[test]
    fn test_show_empty() {
        assert_eq!(show(&CartState::default()), "Your cart is empty.\n");
    }

    #[test]
    fn test_add_and_show_totals() {
        let catalog = Catalog::builtin();
        let mut cart = cart();
        let id = first_id(&catalog);

        let out = add(&mut cart, &catalog, &id, 2).unwrap();

        assert_eq!(cart.state().item_count(), 2);
        assert!(out.contains("Items:    2"));
        assert!(out.contains("Total:    Rs "));
    }

    #[test]
    fn test_show_layout() {
        let catalog = Catalog::builtin();
        let mut cart = cart();
        let id = first_id(&catalog);

        let out = add(&mut cart, &catalog, &id, 1).unwrap();
        let mut lines = out.lines();

        assert!(out.ends_with('\n'));
        let first = lines.next().unwrap();
        assert!(first.starts_with("  1 x "));
        assert!(first.ends_with(&format!("({id})")));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Items:    1"));
        assert!(lines.next().unwrap().starts_with("Subtotal: "));
    }

    #[test]
    fn test_add_zero_quantity() {
        let catalog = Catalog::builtin();
        let id = first_id(&catalog);
        let err = add(&mut cart(), &catalog, &id, 0).unwrap_err();
        assert!(matches!(err, CommandError::ZeroQuantity));
    }

    #[test]
    fn test_add_unknown_product() {
        let err = add(&mut cart(), &Catalog::builtin(), "nope", 1).unwrap_err();
        assert!(matches!(err, CommandError::UnknownProduct(_)));
    }

    #[test]
    fn test_set_quantity_and_remove_by_zero() {
        let catalog = Catalog::builtin();
        let mut cart = cart();
        let id = first_id(&catalog);
        add(&mut cart, &catalog, &id, 1).unwrap();

        set(&mut cart, &id, 5).unwrap();
        assert_eq!(cart.state().item_count(), 5);

        let out = set(&mut cart, &id, 0).unwrap();
        assert!(cart.state().is_empty());
        assert_eq!(out, "Your cart is empty.\n");
    }

    #[test]
    fn test_set_missing_line() {
        let err = set(&mut cart(), "p1", 3).unwrap_err();
        assert!(matches!(err, CommandError::NotInCart(id) if id == "p1"));
    }

    #[test]
    fn test_remove_and_clear() {
        let catalog = Catalog::builtin();
        let mut cart = cart();
        let id = first_id(&catalog);
        add(&mut cart, &catalog, &id, 1).unwrap();

        remove(&mut cart, &id).unwrap();
        assert!(cart.state().is_empty());
        assert!(remove(&mut cart, &id).is_err());

        add(&mut cart, &catalog, &id, 3).unwrap();
        assert_eq!(clear(&mut cart), "Your cart is empty.\n");
    }
}
