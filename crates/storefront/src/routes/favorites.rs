//! Favorites route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use polished_core::ProductId;
use polished_core::format::format_datetime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::favorites::{FavoriteItem, FavoritesStore};
use crate::pricing::format_amount;
use crate::state::AppState;

/// Favorite display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteView {
    #[serde(flatten)]
    pub item: FavoriteItem,
    pub price_display: String,
    /// e.g. `"June 5, 2025"`.
    pub added_display: String,
}

impl From<&FavoriteItem> for FavoriteView {
    fn from(item: &FavoriteItem) -> Self {
        Self {
            item: item.clone(),
            price_display: format_amount(item.product.price),
            added_display: format_datetime(&item.added_at),
        }
    }
}

/// Favorites page data.
#[derive(Debug, Clone, Serialize)]
pub struct FavoritesView {
    pub favorites: Vec<FavoriteView>,
    pub count: usize,
}

impl From<&FavoritesStore> for FavoritesView {
    fn from(store: &FavoritesStore) -> Self {
        Self {
            favorites: store.favorites().iter().map(FavoriteView::from).collect(),
            count: store.len(),
        }
    }
}

/// Add to favorites request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub product_id: String,
}

/// Toggle result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub product_id: ProductId,
    pub is_favorite: bool,
    pub count: usize,
}

/// List favorites.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<FavoritesView> {
    Json(FavoritesView::from(state.session().favorites()))
}

/// Favorite a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddFavoriteRequest>,
) -> Result<Json<FavoritesView>> {
    let id = ProductId::new(body.product_id);
    let product = state
        .catalog()
        .find(&id)
        .ok_or_else(|| AppError::product_not_found(id.as_str()))?;

    let mut session = state.session();
    session.favorites_mut().add_to_favorites(product);
    Ok(Json(FavoritesView::from(session.favorites())))
}

/// Flip a product's favorite status.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .find(&id)
        .ok_or_else(|| AppError::product_not_found(id.as_str()))?;

    let mut session = state.session();
    let is_favorite = session.favorites_mut().toggle_favorite(product);
    Ok(Json(ToggleResponse {
        count: session.favorites().len(),
        product_id: id,
        is_favorite,
    }))
}

/// Remove a favorite. Unknown ids are ignored.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Json<FavoritesView> {
    let mut session = state.session();
    session
        .favorites_mut()
        .remove_from_favorites(&ProductId::new(id));
    Json(FavoritesView::from(session.favorites()))
}

/// Clear all favorites.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<FavoritesView> {
    let mut session = state.session();
    session.favorites_mut().clear_favorites();
    Json(FavoritesView::from(session.favorites()))
}
