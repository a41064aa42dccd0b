//! Shopping cart store.
//!
//! The cart is a list of line items (one per product id, quantity ≥ 1) plus a
//! derived total. State changes go through [`CartAction`] and the pure
//! [`reduce`] function; [`CartStore`] wraps that with persistence under the
//! `"cart"` storage key.
//!
//! # Stored format
//!
//! ```json
//! { "items": [{ "id": "1", "name": "...", "price": "18.99", ..., "quantity": 2 }],
//!   "totalPrice": "37.98" }
//! ```
//!
//! The stored total is ignored on load and recomputed from the items. The
//! older `cartItems` field name is still accepted.

use std::sync::Arc;

use polished_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{self, OrderTotals};
use crate::storage::{self, Storage};

/// Storage key for the cart document.
pub const CART_STORAGE_KEY: &str = "cart";

/// A product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Cart contents and their total.
///
/// Fields are private so the total can only change together with the items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredCart")]
pub struct CartState {
    items: Vec<CartLineItem>,
    total_price: Decimal,
}

/// Shape accepted when reading a stored cart.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCart {
    #[serde(default, alias = "cartItems")]
    items: Vec<CartLineItem>,
}

impl From<StoredCart> for CartState {
    fn from(stored: StoredCart) -> Self {
        Self::from_items(stored.items)
    }
}

impl CartState {
    /// Build a cart from line items, merging duplicate ids and dropping
    /// zero-quantity lines.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut merged: Vec<CartLineItem> = Vec::new();
        for item in items {
            if item.quantity == 0 || item.product.id.is_empty() {
                continue;
            }
            match merged.iter_mut().find(|m| m.product.id == item.product.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => merged.push(item),
            }
        }
        Self::with_items(merged)
    }

    fn with_items(items: Vec<CartLineItem>) -> Self {
        let total_price = items.iter().map(CartLineItem::line_total).sum();
        Self { items, total_price }
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.product.id == id)
    }

    /// Whether a product is in the cart.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.line(id).is_some()
    }

    /// Price breakdown shown next to the cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let totals = OrderTotals::from_subtotal(self.total_price);
        let free_shipping_remaining = if totals.shipping.is_zero() {
            None
        } else {
            pricing::free_shipping_remaining(self.total_price)
        };

        CartSummary {
            totals,
            item_count: self.item_count(),
            free_shipping_remaining,
        }
    }
}

/// Estimated totals for the current cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub item_count: u64,
    /// Amount left to spend before shipping becomes free.
    pub free_shipping_remaining: Option<Decimal>,
}

/// A cart state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product.
    Add(Product),
    /// Add several units of a product at once.
    AddQuantity { product: Product, quantity: u32 },
    /// Drop a product's line.
    Remove(ProductId),
    /// Set a line's quantity; zero or less removes it.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Empty the cart.
    Clear,
}

/// Apply an action to a cart, returning the new state.
#[must_use]
pub fn reduce(state: CartState, action: CartAction) -> CartState {
    match action {
        CartAction::Add(product) => reduce(
            state,
            CartAction::AddQuantity {
                product,
                quantity: 1,
            },
        ),
        CartAction::AddQuantity { product, quantity } => {
            if product.id.is_empty() || quantity == 0 {
                return state;
            }
            let mut items = state.items;
            match items.iter_mut().find(|item| item.product.id == product.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
                None => items.push(CartLineItem { product, quantity }),
            }
            CartState::with_items(items)
        }
        CartAction::Remove(id) => {
            let mut items = state.items;
            items.retain(|item| item.product.id != id);
            CartState::with_items(items)
        }
        CartAction::UpdateQuantity { id, quantity } if quantity <= 0 => {
            reduce(state, CartAction::Remove(id))
        }
        CartAction::UpdateQuantity { id, quantity } => {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            let mut items = state.items;
            if let Some(item) = items.iter_mut().find(|item| item.product.id == id) {
                item.quantity = quantity;
            }
            CartState::with_items(items)
        }
        CartAction::Clear => CartState::default(),
    }
}

/// The shopper's cart with persistence.
///
/// Every mutation writes the whole state to storage. Storage failures are
/// logged and otherwise ignored; the in-memory cart stays authoritative.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    state: CartState,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the cart, rehydrating it from storage.
    ///
    /// A missing, unreadable or malformed stored cart yields an empty cart.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let state = match storage::load_json::<CartState>(storage.as_ref(), CART_STORAGE_KEY) {
            Ok(Some(state)) => {
                tracing::debug!(lines = state.items.len(), "Loaded cart from storage");
                state
            }
            Ok(None) => CartState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart, starting empty");
                CartState::default()
            }
        };

        Self { storage, state }
    }

    /// Current cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Apply an action and persist the result.
    pub fn dispatch(&mut self, action: CartAction) {
        tracing::debug!(?action, "Cart action");
        self.state = reduce(std::mem::take(&mut self.state), action);
        self.persist();
    }

    /// Add one unit of a product. Products without an id are ignored.
    pub fn add_to_cart(&mut self, product: &Product) {
        if product.id.is_empty() {
            tracing::warn!(name = %product.name, "Ignoring product without id");
            return;
        }
        self.dispatch(CartAction::Add(product.clone()));
    }

    /// Add `quantity` units of a product, the same as `quantity` successive
    /// adds but persisted once. Zero is a no-op.
    pub fn add_to_cart_quantity(&mut self, product: &Product, quantity: u32) {
        if product.id.is_empty() {
            tracing::warn!(name = %product.name, "Ignoring product without id");
            return;
        }
        if quantity == 0 {
            return;
        }
        self.dispatch(CartAction::AddQuantity {
            product: product.clone(),
            quantity,
        });
    }

    /// Remove a product's line. Unknown ids are a no-op.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.dispatch(CartAction::Remove(id.clone()));
    }

    /// Set a product's quantity; zero or negative removes the line.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity {
            id: id.clone(),
            quantity,
        });
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    /// Write the current state to storage, logging any failure.
    pub fn persist(&self) {
        if let Err(e) = storage::save_json(self.storage.as_ref(), CART_STORAGE_KEY, &self.state) {
            tracing::error!(error = %e, "Failed to save cart");
        }
    }
}
