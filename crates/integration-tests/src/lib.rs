//! Integration tests for the Polished storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p polished-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to confirmation through the session API
//! - `persistence` - Cart and favorites surviving a restart on disk
//! - `api` - The HTTP router driven with `tower::ServiceExt::oneshot`
//!
//! This library holds the fixtures those tests share.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use polished_core::{PaymentMethod, Product, ProductId};
use polished_storefront::catalog::Catalog;
use polished_storefront::checkout::{PaymentForm, ShippingForm};
use polished_storefront::config::StorefrontConfig;
use polished_storefront::state::AppState;
use polished_storefront::storage::{MemoryStorage, Storage};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

/// A product with a whole-rupee price.
#[must_use]
pub fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Test Product {id}"),
        price: Decimal::from(price),
        image: format!("https://example.com/{id}.jpg"),
        category: "Polish".to_owned(),
        description: None,
    }
}

/// A shipping form that passes validation.
#[must_use]
pub fn shipping_form() -> ShippingForm {
    ShippingForm {
        full_name: "Ayesha Khan".to_owned(),
        address_line1: "12 Canal Road".to_owned(),
        address_line2: None,
        city: "Lahore".to_owned(),
        state: "Punjab".to_owned(),
        postal_code: "54000".to_owned(),
        phone: "+923001234567".to_owned(),
        email: "ayesha@example.com".to_owned(),
        ..ShippingForm::default()
    }
}

/// A credit card form that passes validation until the end of 2099.
#[must_use]
pub fn card_form() -> PaymentForm {
    PaymentForm {
        method: PaymentMethod::CreditCard,
        card_number: "4242424242424242".to_owned(),
        cardholder_name: "Ayesha Khan".to_owned(),
        expiry_date: "12/99".to_owned(),
        cvv: "123".to_owned(),
    }
}

/// A fresh, empty directory under the system temp dir.
#[must_use]
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("polished-it-{}", uuid::Uuid::new_v4()))
}

/// Build the storefront router over the built-in catalog and `storage`.
#[must_use]
pub fn app_with_storage(storage: Arc<dyn Storage>) -> (Router, AppState) {
    let config = StorefrontConfig {
        static_dir: temp_dir(),
        ..StorefrontConfig::default()
    };
    let state = AppState::new(config, Catalog::builtin(), storage);
    (polished_storefront::app(state.clone()), state)
}

/// Build the storefront router over in-memory storage.
#[must_use]
pub fn app() -> (Router, AppState) {
    app_with_storage(Arc::new(MemoryStorage::new()))
}

/// Send one request and return the status and JSON body (`Null` when the
/// body is empty or not JSON).
///
/// # Panics
///
/// Panics if the request cannot be built or the router fails.
#[allow(clippy::unwrap_used)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
