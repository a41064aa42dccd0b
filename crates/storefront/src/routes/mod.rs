//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Health check
//!
//! # Products
//! GET    /api/products                 - Listing (?search=&category=&sort=)
//! GET    /api/products/featured        - Featured strip
//! GET    /api/products/categories      - Category names
//! GET    /api/products/{id}            - Product detail with related products
//!
//! # Cart
//! GET    /api/cart                     - Cart with totals
//! DELETE /api/cart                     - Empty the cart
//! POST   /api/cart/items               - Add a product ({ productId, quantity? })
//! PATCH  /api/cart/items/{id}          - Set quantity ({ quantity }; <= 0 removes)
//! DELETE /api/cart/items/{id}          - Remove a line
//!
//! # Favorites
//! GET    /api/favorites                - Favorites list
//! DELETE /api/favorites                - Clear favorites
//! POST   /api/favorites                - Add ({ productId })
//! POST   /api/favorites/{id}/toggle    - Heart button
//! DELETE /api/favorites/{id}           - Remove
//!
//! # Checkout
//! GET    /api/checkout                 - Current checkout state
//! POST   /api/checkout/begin           - Snapshot the cart
//! POST   /api/checkout/shipping        - Submit shipping (step 1 → 2)
//! POST   /api/checkout/payment         - Submit payment (step 2 → 3)
//! POST   /api/checkout/back            - Previous step
//! POST   /api/checkout/edit/shipping   - Review → shipping
//! POST   /api/checkout/edit/payment    - Review → payment
//! POST   /api/checkout/place-order     - Review → confirmation
//! POST   /api/checkout/reset           - Back to the storefront
//! ```
//!
//! Unknown paths under `/api` answer a JSON 404; everything else falls
//! through to the static single-page app.

pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/categories", get(products::categories))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", delete(cart::remove).patch(cart::update))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(favorites::index)
                .post(favorites::add)
                .delete(favorites::clear),
        )
        .route("/{id}", delete(favorites::remove))
        .route("/{id}/toggle", post(favorites::toggle))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/begin", post(checkout::begin))
        .route("/shipping", post(checkout::submit_shipping))
        .route("/payment", post(checkout::submit_payment))
        .route("/back", post(checkout::back))
        .route("/edit/shipping", post(checkout::edit_shipping))
        .route("/edit/payment", post(checkout::edit_payment))
        .route("/place-order", post(checkout::place_order))
        .route("/reset", post(checkout::reset))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
        .nest("/checkout", checkout_routes())
        .fallback(api_not_found);

    Router::new().nest("/api", api)
}

async fn api_not_found() -> AppError {
    AppError::NotFound {
        message: "no such endpoint".to_string(),
        redirect: None,
    }
}
