//! Checkout workflow.
//!
//! Checkout is a four-step state machine:
//!
//! ```text
//! 1 Shipping ──submit──▶ 2 Payment ──submit──▶ 3 Review ──place order──▶ 4 Confirmation
//!     ▲                     │  ▲                   │
//!     └───────back──────────┘  └───────back────────┘
//!     ▲                                            │
//!     └──────────────edit shipping─────────────────┘   (edit payment returns to 2)
//! ```
//!
//! Entering checkout snapshots the cart and freezes its totals. Later cart
//! changes do not touch the snapshot until checkout is entered again.
//! [`reduce`] applies raw state changes; [`OrderWorkflow`] only exposes the
//! guarded transitions above.

pub mod validation;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use polished_core::{OrderId, OrderIdError, OrderStatus, PaymentMethod};
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

pub use validation::{
    CardSummary, CreditCardInfo, FieldErrors, PaymentDetails, PaymentForm, ShippingAddress,
    ShippingForm, validate_payment, validate_shipping,
};

use crate::cart::{CartLineItem, CartState, CartStore};
use crate::pricing::OrderTotals;

/// Where the shopper is sent when checkout is entered with an empty cart.
pub const CART_PATH: &str = "/cart";

// =============================================================================
// Steps
// =============================================================================

/// The current checkout step. Serialized as its number, 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CheckoutStep {
    #[default]
    Shipping = 1,
    Payment = 2,
    Review = 3,
    Confirmation = 4,
}

impl CheckoutStep {
    /// The step number, 1 to 4.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Review => "review",
            Self::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<CheckoutStep> for u8 {
    fn from(step: CheckoutStep) -> Self {
        step.number()
    }
}

/// A step number outside 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid checkout step: {0}")]
pub struct InvalidStep(pub u8);

impl TryFrom<u8> for CheckoutStep {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Shipping),
            2 => Ok(Self::Payment),
            3 => Ok(Self::Review),
            4 => Ok(Self::Confirmation),
            other => Err(InvalidStep(other)),
        }
    }
}

/// A guarded workflow operation, named in transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SubmitShipping,
    SubmitPayment,
    Back,
    EditShipping,
    EditPayment,
    PlaceOrder,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SubmitShipping => "submit shipping details",
            Self::SubmitPayment => "submit payment details",
            Self::Back => "go back",
            Self::EditShipping => "edit shipping details",
            Self::EditPayment => "edit payment details",
            Self::PlaceOrder => "place the order",
        })
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors returned by checkout transitions. The workflow state is left
/// untouched whenever one is returned.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout needs at least one cart line.
    #[error("your cart is empty")]
    EmptyCart,

    /// The operation is not available at the current step.
    #[error("cannot {operation} during the {step} step")]
    InvalidTransition {
        step: CheckoutStep,
        operation: Operation,
    },

    /// The submitted form has invalid fields.
    #[error("please correct the highlighted fields: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    OrderId(#[from] OrderIdError),
}

impl CheckoutError {
    /// Page the shopper should be sent to, if any.
    #[must_use]
    pub const fn redirect(&self) -> Option<&'static str> {
        match self {
            Self::EmptyCart => Some(CART_PATH),
            _ => None,
        }
    }
}

// =============================================================================
// State and reducer
// =============================================================================

/// Cart lines and totals frozen at checkout entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSnapshot {
    pub items: Vec<CartLineItem>,
    pub totals: OrderTotals,
}

impl CheckoutSnapshot {
    #[must_use]
    pub fn from_cart(cart: &CartState) -> Self {
        Self {
            items: cart.items().to_vec(),
            totals: OrderTotals::from_subtotal(cart.total_price()),
        }
    }
}

/// Checkout progress. Held in memory only.
///
/// Card details serialize as a masked [`CardSummary`] under `card`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWorkflowState {
    pub items: Vec<CartLineItem>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "card", serialize_with = "serialize_card")]
    pub credit_card_info: Option<CreditCardInfo>,
    pub order_status: OrderStatus,
    pub order_id: Option<OrderId>,
    pub order_date: Option<DateTime<Utc>>,
    pub checkout_step: CheckoutStep,
}

#[allow(clippy::ref_option)]
fn serialize_card<S: Serializer>(
    card: &Option<CreditCardInfo>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    card.as_ref().map(CreditCardInfo::summary).serialize(serializer)
}

/// A raw workflow state change.
#[derive(Debug, Clone)]
pub enum OrderAction {
    SetItems(CheckoutSnapshot),
    SetShippingAddress(ShippingAddress),
    SetPaymentMethod(PaymentMethod),
    SetCreditCardInfo(CreditCardInfo),
    ClearCreditCardInfo,
    SetOrderStatus(OrderStatus),
    SetOrderId(OrderId),
    SetOrderDate(DateTime<Utc>),
    SetCheckoutStep(CheckoutStep),
    Reset,
}

/// Apply an action to the workflow state, returning the new state.
#[must_use]
pub fn reduce(state: OrderWorkflowState, action: OrderAction) -> OrderWorkflowState {
    match action {
        OrderAction::SetItems(snapshot) => OrderWorkflowState {
            items: snapshot.items,
            totals: snapshot.totals,
            ..state
        },
        OrderAction::SetShippingAddress(address) => OrderWorkflowState {
            shipping_address: Some(address),
            ..state
        },
        OrderAction::SetPaymentMethod(method) => OrderWorkflowState {
            payment_method: Some(method),
            ..state
        },
        OrderAction::SetCreditCardInfo(card) => OrderWorkflowState {
            credit_card_info: Some(card),
            ..state
        },
        OrderAction::ClearCreditCardInfo => OrderWorkflowState {
            credit_card_info: None,
            ..state
        },
        OrderAction::SetOrderStatus(order_status) => OrderWorkflowState {
            order_status,
            ..state
        },
        OrderAction::SetOrderId(id) => OrderWorkflowState {
            order_id: Some(id),
            ..state
        },
        OrderAction::SetOrderDate(date) => OrderWorkflowState {
            order_date: Some(date),
            ..state
        },
        OrderAction::SetCheckoutStep(checkout_step) => OrderWorkflowState {
            checkout_step,
            ..state
        },
        OrderAction::Reset => OrderWorkflowState::default(),
    }
}

/// Draw a synthetic order id: `ORD-` and six random digits.
///
/// Only 10^6 values exist and issued ids are not remembered, so collisions
/// become likely as order volume grows. A real order backend must replace
/// this with its own identifiers.
///
/// # Errors
///
/// Never fails for ids drawn from the valid range; the error is propagated
/// rather than assumed away.
pub fn generate_order_id<R: Rng + ?Sized>(rng: &mut R) -> Result<OrderId, OrderIdError> {
    OrderId::from_sequence(rng.random_range(0..=OrderId::MAX_SEQUENCE))
}

// =============================================================================
// Workflow
// =============================================================================

/// The checkout state machine.
#[derive(Debug, Clone, Default)]
pub struct OrderWorkflow {
    state: OrderWorkflowState,
}

impl OrderWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &OrderWorkflowState {
        &self.state
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.state.checkout_step
    }

    fn dispatch(&mut self, action: OrderAction) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    fn require(
        &self,
        allowed: &[CheckoutStep],
        operation: Operation,
    ) -> Result<(), CheckoutError> {
        let step = self.step();
        if allowed.contains(&step) {
            Ok(())
        } else {
            tracing::debug!(%step, %operation, "Rejected checkout transition");
            Err(CheckoutError::InvalidTransition { step, operation })
        }
    }

    /// Enter checkout: snapshot the cart and its totals.
    ///
    /// The current step is kept, so re-entering mid-checkout resumes where the
    /// shopper left off with fresh figures. Once the order is confirmed this
    /// does nothing, keeping the confirmation viewable.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn begin(&mut self, cart: &CartState) -> Result<(), CheckoutError> {
        if self.step() == CheckoutStep::Confirmation {
            return Ok(());
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.dispatch(OrderAction::SetItems(CheckoutSnapshot::from_cart(cart)));
        Ok(())
    }

    /// Step 1 → 2: store a validated shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if not at the shipping step or the form is invalid.
    pub fn submit_shipping(&mut self, form: &ShippingForm) -> Result<(), CheckoutError> {
        self.require(&[CheckoutStep::Shipping], Operation::SubmitShipping)?;
        let address = validate_shipping(form).map_err(CheckoutError::Validation)?;

        self.dispatch(OrderAction::SetShippingAddress(address));
        self.dispatch(OrderAction::SetCheckoutStep(CheckoutStep::Payment));
        Ok(())
    }

    /// Step 2 → 3: store the payment method and, for cards, the card details.
    ///
    /// Choosing cash on delivery drops any card details entered earlier.
    ///
    /// # Errors
    ///
    /// Returns an error if not at the payment step or the card is invalid.
    pub fn submit_payment(
        &mut self,
        form: &PaymentForm,
        today: NaiveDate,
    ) -> Result<(), CheckoutError> {
        self.require(&[CheckoutStep::Payment], Operation::SubmitPayment)?;
        let payment = validate_payment(form, today).map_err(CheckoutError::Validation)?;

        self.dispatch(OrderAction::SetPaymentMethod(payment.method));
        match payment.card {
            Some(card) => self.dispatch(OrderAction::SetCreditCardInfo(card)),
            None => self.dispatch(OrderAction::ClearCreditCardInfo),
        }
        self.dispatch(OrderAction::SetCheckoutStep(CheckoutStep::Review));
        Ok(())
    }

    /// Step 2 → 1 or 3 → 2.
    ///
    /// # Errors
    ///
    /// Returns an error at the shipping or confirmation step.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        let previous = match self.step() {
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Review => CheckoutStep::Payment,
            step => {
                return Err(CheckoutError::InvalidTransition {
                    step,
                    operation: Operation::Back,
                });
            }
        };
        self.dispatch(OrderAction::SetCheckoutStep(previous));
        Ok(())
    }

    /// Step 3 → 1, keeping the entered data.
    ///
    /// # Errors
    ///
    /// Returns an error unless at the review step.
    pub fn edit_shipping(&mut self) -> Result<(), CheckoutError> {
        self.require(&[CheckoutStep::Review], Operation::EditShipping)?;
        self.dispatch(OrderAction::SetCheckoutStep(CheckoutStep::Shipping));
        Ok(())
    }

    /// Step 3 → 2, keeping the entered data.
    ///
    /// # Errors
    ///
    /// Returns an error unless at the review step.
    pub fn edit_payment(&mut self) -> Result<(), CheckoutError> {
        self.require(&[CheckoutStep::Review], Operation::EditPayment)?;
        self.dispatch(OrderAction::SetCheckoutStep(CheckoutStep::Payment));
        Ok(())
    }

    /// Step 3 → 4: record an order id and date, then empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error unless at the review step with a non-empty snapshot
    /// and a non-empty live cart.
    pub fn place_order<R: Rng + ?Sized>(
        &mut self,
        cart: &mut CartStore,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<OrderId, CheckoutError> {
        self.require(&[CheckoutStep::Review], Operation::PlaceOrder)?;
        if self.state.items.is_empty() || cart.state().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let order_id = generate_order_id(rng)?;

        self.dispatch(OrderAction::SetOrderId(order_id.clone()));
        self.dispatch(OrderAction::SetOrderDate(now));
        self.dispatch(OrderAction::SetCheckoutStep(CheckoutStep::Confirmation));
        cart.clear_cart();

        tracing::info!(
            order_id = %order_id,
            total = %self.state.totals.total,
            lines = self.state.items.len(),
            "Order placed"
        );
        Ok(order_id)
    }

    /// Return to the initial state. Allowed from any step.
    pub fn reset(&mut self) {
        self.dispatch(OrderAction::Reset);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use polished_core::{Product, ProductId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            image: format!("https://example.com/{id}.jpg"),
            category: "Polish".to_string(),
            description: None,
        }
    }

    fn shipping_form() -> ShippingForm {
        ShippingForm {
            full_name: "Ayesha Khan".to_string(),
            address_line1: "12 Mall Road".to_string(),
            city: "Lahore".to_string(),
            state: "Punjab".to_string(),
            postal_code: "54000".to_string(),
            phone: "03001234567".to_string(),
            email: "ayesha@example.com".to_string(),
            ..ShippingForm::default()
        }
    }

    fn card_form() -> PaymentForm {
        PaymentForm {
            method: PaymentMethod::CreditCard,
            card_number: "4242 4242 4242 4242".to_string(),
            cardholder_name: "Ayesha Khan".to_string(),
            expiry_date: "1226".to_string(),
            cvv: "321".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn cart_with(products: &[(&Product, u32)]) -> CartStore {
        let mut cart = CartStore::open(Arc::new(MemoryStorage::new()));
        for (product, quantity) in products {
            cart.add_to_cart_quantity(product, *quantity);
        }
        cart
    }

    fn at_review(cart: &CartStore) -> OrderWorkflow {
        let mut workflow = OrderWorkflow::new();
        workflow.begin(cart.state()).unwrap();
        workflow.submit_shipping(&shipping_form()).unwrap();
        workflow.submit_payment(&card_form(), today()).unwrap();
        workflow
    }

    fn assert_invalid(result: Result<(), CheckoutError>, expected_step: CheckoutStep) {
        match result {
            Err(CheckoutError::InvalidTransition { step, .. }) => assert_eq!(step, expected_step),
            other => panic!("expected invalid transition, got {other:?}"),
        }
    }

    #[test]
    fn test_step_serializes_as_number() {
        assert_eq!(serde_json::to_string(&CheckoutStep::Review).unwrap(), "3");
        let step: CheckoutStep = serde_json::from_str("4").unwrap();
        assert_eq!(step, CheckoutStep::Confirmation);
        assert!(serde_json::from_str::<CheckoutStep>("5").is_err());
    }

    #[test]
    fn test_begin_snapshots_totals() {
        let a = product("a", 1000);
        let cart = cart_with(&[(&a, 2)]);

        let mut workflow = OrderWorkflow::new();
        workflow.begin(cart.state()).unwrap();

        let state = workflow.state();
        assert_eq!(state.checkout_step, CheckoutStep::Shipping);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.totals.subtotal, Decimal::from(2000));
        assert_eq!(state.totals.tax, Decimal::from(300));
        assert_eq!(state.totals.shipping, Decimal::from(500));
        assert_eq!(state.totals.total, Decimal::from(2800));
    }

    #[test]
    fn test_begin_with_empty_cart_redirects() {
        let cart = cart_with(&[]);
        let mut workflow = OrderWorkflow::new();

        let err = workflow.begin(cart.state()).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(err.redirect(), Some("/cart"));
    }

    #[test]
    fn test_snapshot_is_decoupled_from_cart() {
        let a = product("a", 1000);
        let mut cart = cart_with(&[(&a, 1)]);
        let mut workflow = OrderWorkflow::new();
        workflow.begin(cart.state()).unwrap();

        cart.update_quantity(&a.id, 10);
        assert_eq!(workflow.state().totals.subtotal, Decimal::from(1000));

        workflow.submit_shipping(&shipping_form()).unwrap();
        workflow.begin(cart.state()).unwrap();
        assert_eq!(workflow.step(), CheckoutStep::Payment);
        assert_eq!(workflow.state().totals.subtotal, Decimal::from(10_000));
        assert_eq!(workflow.state().totals.shipping, Decimal::ZERO);
    }

    #[test]
    fn test_full_flow() {
        let a = product("a", 1000);
        let mut cart = cart_with(&[(&a, 2)]);
        let mut workflow = at_review(&cart);
        assert_eq!(workflow.step(), CheckoutStep::Review);

        let now = Utc.with_ymd_and_hms(2025, 6, 5, 10, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let order_id = workflow.place_order(&mut cart, now, &mut rng).unwrap();

        let state = workflow.state();
        assert_eq!(state.checkout_step, CheckoutStep::Confirmation);
        assert_eq!(state.order_id.as_ref(), Some(&order_id));
        assert_eq!(state.order_date, Some(now));
        assert_eq!(state.order_status, OrderStatus::Pending);
        assert_eq!(state.totals.total, Decimal::from(2800));
        assert!(order_id.as_str().starts_with("ORD-"));
        assert_eq!(order_id.as_str().len(), 10);
        assert!(cart.state().is_empty());
    }

    #[test]
    fn test_place_order_requires_live_cart() {
        let a = product("a", 1000);
        let mut cart = cart_with(&[(&a, 1)]);
        let mut workflow = at_review(&cart);

        cart.clear_cart();
        let result = workflow.place_order(&mut cart, Utc::now(), &mut StdRng::seed_from_u64(7));

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert_eq!(workflow.step(), CheckoutStep::Review);
        assert!(workflow.state().order_id.is_none());
        assert!(workflow.state().order_date.is_none());
    }

    #[test]
    fn test_back_and_edit() {
        let cart = cart_with(&[(&product("a", 10), 1)]);
        let mut workflow = at_review(&cart);

        workflow.back().unwrap();
        assert_eq!(workflow.step(), CheckoutStep::Payment);
        workflow.back().unwrap();
        assert_eq!(workflow.step(), CheckoutStep::Shipping);
        assert!(workflow.state().shipping_address.is_some());

        let mut workflow = at_review(&cart);
        workflow.edit_shipping().unwrap();
        assert_eq!(workflow.step(), CheckoutStep::Shipping);
        assert!(workflow.state().credit_card_info.is_some());

        let mut workflow = at_review(&cart);
        workflow.edit_payment().unwrap();
        assert_eq!(workflow.step(), CheckoutStep::Payment);
    }

    #[test]
    fn test_invalid_transitions_leave_state_untouched() {
        let mut cart = cart_with(&[(&product("a", 10), 1)]);
        let mut workflow = OrderWorkflow::new();
        workflow.begin(cart.state()).unwrap();

        assert_invalid(workflow.back(), CheckoutStep::Shipping);
        assert_invalid(workflow.edit_payment(), CheckoutStep::Shipping);
        assert_invalid(
            workflow.submit_payment(&card_form(), today()),
            CheckoutStep::Shipping,
        );
        assert_invalid(
            workflow
                .place_order(&mut cart, Utc::now(), &mut StdRng::seed_from_u64(1))
                .map(|_| ()),
            CheckoutStep::Shipping,
        );
        assert_eq!(workflow.step(), CheckoutStep::Shipping);
        assert!(!cart.state().is_empty());

        workflow.submit_shipping(&shipping_form()).unwrap();
        assert_invalid(workflow.submit_shipping(&shipping_form()), CheckoutStep::Payment);
        assert_invalid(workflow.edit_shipping(), CheckoutStep::Payment);
        assert_eq!(workflow.step(), CheckoutStep::Payment);
    }

    #[test]
    fn test_validation_failure_keeps_step() {
        let cart = cart_with(&[(&product("a", 10), 1)]);
        let mut workflow = OrderWorkflow::new();
        workflow.begin(cart.state()).unwrap();

        let err = workflow.submit_shipping(&ShippingForm::default()).unwrap_err();
        let CheckoutError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.get("fullName"), Some("Full name is required"));
        assert_eq!(workflow.step(), CheckoutStep::Shipping);
        assert!(workflow.state().shipping_address.is_none());
    }

    #[test]
    fn test_confirmation_is_terminal_until_reset() {
        let a = product("a", 10);
        let mut cart = cart_with(&[(&a, 1)]);
        let mut workflow = at_review(&cart);
        let mut rng = StdRng::seed_from_u64(3);
        workflow.place_order(&mut cart, Utc::now(), &mut rng).unwrap();

        assert_invalid(workflow.back(), CheckoutStep::Confirmation);
        assert_invalid(workflow.edit_shipping(), CheckoutStep::Confirmation);

        // Begin after confirming leaves the confirmation in place, even with
        // a refilled cart.
        cart.add_to_cart(&a);
        workflow.begin(cart.state()).unwrap();
        assert_eq!(workflow.step(), CheckoutStep::Confirmation);
        assert!(workflow.state().order_id.is_some());

        workflow.reset();
        assert_eq!(workflow.step(), CheckoutStep::Shipping);
        assert!(workflow.state().order_id.is_none());
        assert!(workflow.state().items.is_empty());
    }

    #[test]
    fn test_cash_on_delivery_clears_card() {
        let cart = cart_with(&[(&product("a", 10), 1)]);
        let mut workflow = at_review(&cart);
        assert!(workflow.state().credit_card_info.is_some());

        workflow.edit_payment().unwrap();
        workflow
            .submit_payment(&PaymentForm::cash_on_delivery(), today())
            .unwrap();

        let state = workflow.state();
        assert_eq!(state.payment_method, Some(PaymentMethod::CashOnDelivery));
        assert!(state.credit_card_info.is_none());
        assert_eq!(state.checkout_step, CheckoutStep::Review);
    }

    #[test]
    fn test_state_json_masks_card() {
        let cart = cart_with(&[(&product("a", 10), 1)]);
        let workflow = at_review(&cart);

        let json = serde_json::to_value(workflow.state()).unwrap();
        assert_eq!(json["checkoutStep"], 3);
        assert_eq!(json["card"]["lastFour"], "4242");
        assert_eq!(json["paymentMethod"], "credit_card");
        assert!(json.get("subtotal").is_some());
        let text = json.to_string();
        assert!(!text.contains("4242 4242"));
        assert!(!text.contains("321"));
    }

    #[test]
    fn test_generate_order_id_shape() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let id = generate_order_id(&mut rng).unwrap();
            let digits = id.as_str().strip_prefix("ORD-").unwrap();
            assert_eq!(digits.len(), 6);
            assert!(digits.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_reducer_reset() {
        let state = reduce(
            OrderWorkflowState::default(),
            OrderAction::SetCheckoutStep(CheckoutStep::Review),
        );
        let state = reduce(state, OrderAction::SetOrderStatus(OrderStatus::Processing));
        let state = reduce(state, OrderAction::Reset);
        assert_eq!(state.checkout_step, CheckoutStep::Shipping);
        assert_eq!(state.order_status, OrderStatus::Pending);
    }
}
