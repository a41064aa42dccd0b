//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use polished_core::{Product, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::ProductQuery;
use crate::error::{AppError, Result};
use crate::pricing::format_amount;
use crate::state::AppState;

/// A product as shown on listing cards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: String,
    pub is_favorite: bool,
}

impl ProductView {
    fn new(product: &Product, is_favorite: bool) -> Self {
        Self {
            product: product.clone(),
            price_display: format_amount(product.price),
            is_favorite,
        }
    }
}

/// Product page data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductView,
    /// Quantity already in the cart.
    pub in_cart: u32,
    pub related: Vec<ProductView>,
}

fn views<'a>(
    state: &AppState,
    products: impl IntoIterator<Item = &'a Product>,
) -> Vec<ProductView> {
    let session = state.session();
    products
        .into_iter()
        .map(|p| ProductView::new(p, session.favorites().is_favorite(&p.id)))
        .collect()
}

/// Product listing with search, category filter and sort.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<ProductView>> {
    let products = state.catalog().query(&query);
    tracing::debug!(results = products.len(), "Product query");
    Json(views(&state, products))
}

/// The featured products.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<Vec<ProductView>> {
    Json(views(&state, state.catalog().featured()))
}

/// Category names in catalog order.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .catalog()
            .categories()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    )
}

/// Product detail with related products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .find(&id)
        .ok_or_else(|| AppError::product_not_found(id.as_str()))?;
    let related = views(&state, state.catalog().related(&id));

    let session = state.session();
    let in_cart = session
        .cart()
        .state()
        .line(&id)
        .map_or(0, |line| line.quantity);

    Ok(Json(ProductDetail {
        product: ProductView::new(product, session.favorites().is_favorite(&id)),
        in_cart,
        related,
    }))
}
