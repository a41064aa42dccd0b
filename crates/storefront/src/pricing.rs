//! Order pricing: tax, shipping and totals.
//!
//! Rates are fixed: 15% tax on the subtotal, free shipping strictly above
//! Rs 5,000, a flat Rs 500 otherwise.

use polished_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use serde::Serialize;

/// Currency every price in the store is quoted in.
pub const STORE_CURRENCY: CurrencyCode = CurrencyCode::PKR;

/// Sales tax applied to the subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Shipping charged at or below the threshold.
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Subtotal, tax, shipping and grand total for a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = subtotal * TAX_RATE;
        let shipping = shipping_for(subtotal);
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

/// Shipping charge for a subtotal.
#[must_use]
pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING
    }
}

/// Format an amount in the store currency, e.g. `"Rs 2,800"`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    Price::new(amount, STORE_CURRENCY).display()
}

/// How much more the shopper must spend to reach the free-shipping threshold.
///
/// `None` once shipping is free or when the subtotal already sits at the
/// threshold (where the flat rate still applies but there is nothing to add).
#[must_use]
pub fn free_shipping_remaining(subtotal: Decimal) -> Option<Decimal> {
    (subtotal < FREE_SHIPPING_THRESHOLD).then(|| FREE_SHIPPING_THRESHOLD - subtotal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_is_fifteen_percent() {
        let totals = OrderTotals::from_subtotal(Decimal::from(4000));
        assert_eq!(totals.tax, Decimal::from(600));
    }

    #[test]
    fn test_shipping_threshold_is_exclusive() {
        assert_eq!(shipping_for(Decimal::from(5000)), Decimal::from(500));
        assert_eq!(shipping_for(Decimal::from(5001)), Decimal::ZERO);
        assert_eq!(shipping_for(Decimal::ZERO), Decimal::from(500));
    }

    #[test]
    fn test_total_adds_up() {
        let totals = OrderTotals::from_subtotal(Decimal::from(2000));
        assert_eq!(totals.subtotal, Decimal::from(2000));
        assert_eq!(totals.tax, Decimal::from(300));
        assert_eq!(totals.shipping, Decimal::from(500));
        assert_eq!(totals.total, Decimal::from(2800));

        let totals = OrderTotals::from_subtotal(Decimal::from(6000));
        assert_eq!(totals.total, Decimal::from(6900));
    }

    #[test]
    fn test_fractional_subtotal_stays_exact() {
        let totals = OrderTotals::from_subtotal(Decimal::new(3798, 2));
        assert_eq!(totals.tax, Decimal::new(5697, 3));
        assert_eq!(totals.total, Decimal::new(543_677, 3));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(2800)), "Rs 2,800");
        assert_eq!(format_amount(Decimal::new(1899, 2)), "Rs 19");
    }

    #[test]
    fn test_free_shipping_remaining() {
        assert_eq!(
            free_shipping_remaining(Decimal::from(4200)),
            Some(Decimal::from(800))
        );
        assert_eq!(free_shipping_remaining(Decimal::from(5000)), None);
        assert_eq!(free_shipping_remaining(Decimal::from(7000)), None);
    }
}
