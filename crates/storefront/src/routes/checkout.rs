//! Checkout route handlers.
//!
//! Each handler performs one workflow transition and responds with the whole
//! checkout state. Rejected transitions leave the state as it was and answer
//! 409; invalid forms answer 422 with per-field messages.

use axum::{Json, extract::State};
use polished_core::format::format_datetime;
use serde::Serialize;
use tracing::instrument;

use crate::checkout::{CheckoutError, OrderWorkflowState, PaymentForm, ShippingForm};
use crate::error::{Result, add_breadcrumb};
use crate::pricing::format_amount;
use crate::session::ShopperSession;
use crate::state::AppState;

/// Checkout display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    #[serde(flatten)]
    pub state: OrderWorkflowState,
    pub step_name: &'static str,
    pub subtotal_display: String,
    pub tax_display: String,
    pub shipping_display: String,
    pub total_display: String,
    pub order_date_display: Option<String>,
}

impl From<&OrderWorkflowState> for CheckoutView {
    fn from(state: &OrderWorkflowState) -> Self {
        let totals = state.totals;
        Self {
            state: state.clone(),
            step_name: state.checkout_step.name(),
            subtotal_display: format_amount(totals.subtotal),
            tax_display: format_amount(totals.tax),
            shipping_display: format_amount(totals.shipping),
            total_display: format_amount(totals.total),
            order_date_display: state.order_date.as_ref().map(format_datetime),
        }
    }
}

/// Run a transition against the session and render the resulting state.
fn transition(
    state: &AppState,
    apply: impl FnOnce(&mut ShopperSession) -> std::result::Result<(), CheckoutError>,
) -> Result<Json<CheckoutView>> {
    let mut session = state.session();
    apply(&mut *session)?;
    Ok(Json(CheckoutView::from(session.checkout().state())))
}

/// Current checkout state.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CheckoutView> {
    Json(CheckoutView::from(state.session().checkout().state()))
}

/// Enter checkout, snapshotting the cart.
#[instrument(skip(state))]
pub async fn begin(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    transition(&state, ShopperSession::enter_checkout)
}

/// Submit the shipping form.
#[instrument(skip(state, form))]
pub async fn submit_shipping(
    State(state): State<AppState>,
    Json(form): Json<ShippingForm>,
) -> Result<Json<CheckoutView>> {
    transition(&state, |session| session.submit_shipping(&form))
}

/// Submit the payment form.
#[instrument(skip(state, form))]
pub async fn submit_payment(
    State(state): State<AppState>,
    Json(form): Json<PaymentForm>,
) -> Result<Json<CheckoutView>> {
    transition(&state, |session| session.submit_payment(&form))
}

/// Go back one step.
#[instrument(skip(state))]
pub async fn back(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    transition(&state, ShopperSession::checkout_back)
}

/// Jump from review to the shipping step.
#[instrument(skip(state))]
pub async fn edit_shipping(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    transition(&state, ShopperSession::edit_shipping)
}

/// Jump from review to the payment step.
#[instrument(skip(state))]
pub async fn edit_payment(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    transition(&state, ShopperSession::edit_payment)
}

/// Place the order.
#[instrument(skip(state))]
pub async fn place_order(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    transition(&state, |session| {
        let order_id = session.place_order()?;
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", order_id.as_str())]),
        );
        Ok(())
    })
}

/// Leave checkout and reset it.
#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Json<CheckoutView> {
    let mut session = state.session();
    session.return_to_store();
    Json(CheckoutView::from(session.checkout().state()))
}
