//! Polished storefront library.
//!
//! The cart, favorites and checkout stores live here alongside the HTTP
//! layer that exposes them, so both the server binary and the CLI can drive
//! the same state.
//!
//! - [`cart`]: cart reducer and persisted store
//! - [`favorites`]: favorites reducer and persisted store
//! - [`checkout`]: four-step order workflow and form validation
//! - [`session`]: one shopper's stores bundled together
//! - [`routes`]: JSON API over the session

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod pricing;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;

use axum::{Router, extract::Request, routing::get};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router: health check, JSON API, and the static
/// single-page app with an `index.html` fallback for client-side routes.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .fallback_service(spa)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
