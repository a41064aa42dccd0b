//! One shopper's cart, favorites and checkout, wired to a storage backend.
//!
//! The session owns the three stores and bridges the checkout workflow to the
//! live cart: entering checkout snapshots it and placing an order clears it.

use std::sync::Arc;

use chrono::Utc;
use polished_core::OrderId;

use crate::cart::CartStore;
use crate::checkout::{CheckoutError, OrderWorkflow, PaymentForm, ShippingForm};
use crate::favorites::FavoritesStore;
use crate::storage::Storage;

/// Cart, favorites and checkout state for a single shopper.
#[derive(Debug)]
pub struct ShopperSession {
    cart: CartStore,
    favorites: FavoritesStore,
    checkout: OrderWorkflow,
}

impl ShopperSession {
    /// Rehydrate the cart and favorites from `storage` and start a fresh
    /// checkout.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let cart = CartStore::open(Arc::clone(&storage));
        let favorites = FavoritesStore::open(storage);

        tracing::info!(
            cart_lines = cart.state().items().len(),
            favorites = favorites.len(),
            "Shopper session opened"
        );

        Self {
            cart,
            favorites,
            checkout: OrderWorkflow::new(),
        }
    }

    /// Write both stores to storage.
    pub fn flush(&self) {
        self.cart.persist();
        self.favorites.persist();
    }

    /// Flush and end the session.
    pub fn close(self) {
        self.flush();
        tracing::debug!("Shopper session closed");
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub const fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    #[must_use]
    pub const fn checkout(&self) -> &OrderWorkflow {
        &self.checkout
    }

    /// Enter checkout with the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn enter_checkout(&mut self) -> Result<(), CheckoutError> {
        self.checkout.begin(self.cart.state())
    }

    /// Submit the shipping step.
    ///
    /// # Errors
    ///
    /// See [`OrderWorkflow::submit_shipping`].
    pub fn submit_shipping(&mut self, form: &ShippingForm) -> Result<(), CheckoutError> {
        self.checkout.submit_shipping(form)
    }

    /// Submit the payment step, checking card expiry against today's UTC date.
    ///
    /// # Errors
    ///
    /// See [`OrderWorkflow::submit_payment`].
    pub fn submit_payment(&mut self, form: &PaymentForm) -> Result<(), CheckoutError> {
        self.checkout.submit_payment(form, Utc::now().date_naive())
    }

    /// Step back one checkout step.
    ///
    /// # Errors
    ///
    /// See [`OrderWorkflow::back`].
    pub fn checkout_back(&mut self) -> Result<(), CheckoutError> {
        self.checkout.back()
    }

    /// Return from review to the shipping step.
    ///
    /// # Errors
    ///
    /// See [`OrderWorkflow::edit_shipping`].
    pub fn edit_shipping(&mut self) -> Result<(), CheckoutError> {
        self.checkout.edit_shipping()
    }

    /// Return from review to the payment step.
    ///
    /// # Errors
    ///
    /// See [`OrderWorkflow::edit_payment`].
    pub fn edit_payment(&mut self) -> Result<(), CheckoutError> {
        self.checkout.edit_payment()
    }

    /// Place the order now and empty the cart.
    ///
    /// # Errors
    ///
    /// See [`OrderWorkflow::place_order`].
    pub fn place_order(&mut self) -> Result<OrderId, CheckoutError> {
        self.checkout
            .place_order(&mut self.cart, Utc::now(), &mut rand::rng())
    }

    /// Leave checkout and go back to the storefront.
    pub fn return_to_store(&mut self) {
        self.checkout.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polished_core::{PaymentMethod, Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::checkout::CheckoutStep;
    use crate::storage::MemoryStorage;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            image: format!("https://example.com/{id}.jpg"),
            category: "Kits".to_string(),
            description: None,
        }
    }

    fn shipping_form() -> ShippingForm {
        ShippingForm {
            full_name: "Sara Malik".to_string(),
            address_line1: "House 4, Street 9".to_string(),
            city: "Karachi".to_string(),
            state: "Sindh".to_string(),
            postal_code: "75500".to_string(),
            phone: "+923211234567".to_string(),
            email: "sara@example.pk".to_string(),
            ..ShippingForm::default()
        }
    }

    #[test]
    fn test_session_shares_storage_between_stores() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = ShopperSession::open(storage.clone());
        session.cart_mut().add_to_cart(&product("1", 100));
        session.favorites_mut().add_to_favorites(&product("2", 200));
        session.close();

        let reopened = ShopperSession::open(storage);
        assert_eq!(reopened.cart().state().item_count(), 1);
        assert!(reopened.favorites().is_favorite(&ProductId::new("2")));
        assert_eq!(reopened.checkout().step(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_checkout_through_session() {
        let mut session = ShopperSession::open(Arc::new(MemoryStorage::new()));
        assert!(matches!(
            session.enter_checkout(),
            Err(CheckoutError::EmptyCart)
        ));

        session.cart_mut().add_to_cart(&product("1", 3000));
        session.enter_checkout().unwrap();
        session.submit_shipping(&shipping_form()).unwrap();
        session
            .submit_payment(&PaymentForm::cash_on_delivery())
            .unwrap();

        let order_id = session.place_order().unwrap();
        assert_eq!(session.checkout().step(), CheckoutStep::Confirmation);
        assert_eq!(
            session.checkout().state().payment_method,
            Some(PaymentMethod::CashOnDelivery)
        );
        assert_eq!(
            session.checkout().state().order_id.as_ref(),
            Some(&order_id)
        );
        assert!(session.cart().state().is_empty());

        session.return_to_store();
        assert_eq!(session.checkout().step(), CheckoutStep::Shipping);
        assert!(session.checkout().state().order_id.is_none());
    }
}
