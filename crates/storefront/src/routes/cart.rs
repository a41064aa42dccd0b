//! Cart route handlers.
//!
//! Every mutation responds with the full updated cart so the client can
//! re-render the cart page and the header badge from one payload.

use axum::{
    Json,
    extract::{Path, State},
};
use polished_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartLineItem, CartState, CartSummary};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::pricing::format_amount;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    #[serde(flatten)]
    pub line: CartLineItem,
    pub line_total: Decimal,
    pub price_display: String,
    pub line_total_display: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let line_total = line.line_total();
        Self {
            line: line.clone(),
            line_total,
            price_display: format_amount(line.product.price),
            line_total_display: format_amount(line_total),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_price: Decimal,
    pub summary: CartSummary,
    pub subtotal_display: String,
    pub total_display: String,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        let summary = cart.summary();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total_price: cart.total_price(),
            subtotal_display: format_amount(summary.totals.subtotal),
            total_display: format_amount(summary.totals.total),
            summary,
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

fn current(state: &AppState) -> CartView {
    CartView::from(state.session().cart().state())
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(current(&state))
}

/// Add a product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let id = ProductId::new(body.product_id);
    let product = state
        .catalog()
        .find(&id)
        .ok_or_else(|| AppError::product_not_found(id.as_str()))?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));

    let mut session = state.session();
    session.cart_mut().add_to_cart_quantity(product, quantity);
    Ok(Json(CartView::from(session.cart().state())))
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    let mut session = state.session();
    session
        .cart_mut()
        .update_quantity(&ProductId::new(id), body.quantity);
    Json(CartView::from(session.cart().state()))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Json<CartView> {
    let mut session = state.session();
    session.cart_mut().remove_from_cart(&ProductId::new(id));
    Json(CartView::from(session.cart().state()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    state.session().cart_mut().clear_cart();
    Json(current(&state))
}
