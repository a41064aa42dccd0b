//! Shipping and payment form validation.
//!
//! Both validators collect one message per offending field, in form order,
//! and only produce the typed value when every field passes.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use polished_core::{Email, PaymentMethod, PhoneNumber};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Country pre-filled on the shipping form.
pub const DEFAULT_COUNTRY: &str = "Pakistan";

/// Digits in a card number.
pub const CARD_NUMBER_DIGITS: usize = 16;

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("Invalid regex"));

// =============================================================================
// Field errors
// =============================================================================

/// Per-field validation messages, keyed by the form's field name.
///
/// Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a message for a field, replacing any earlier one.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = message,
            None => self.0.push((field, message)),
        }
    }

    /// The message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Field names in the order they failed.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(f, _)| *f)
    }

    /// `Ok(value)` when no field failed, otherwise the collected errors.
    ///
    /// # Errors
    ///
    /// Returns `self` if any message was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, message) in &self.0 {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// Raw shipping form input.
///
/// `Debug` shows only the city and country.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingForm {
    pub full_name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

impl fmt::Debug for ShippingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShippingForm")
            .field("city", &self.city)
            .field("country", &self.country)
            .finish_non_exhaustive()
    }
}

impl Default for ShippingForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            address_line1: String::new(),
            address_line2: None,
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            phone: String::new(),
            email: String::new(),
        }
    }
}

impl From<&ShippingAddress> for ShippingForm {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            full_name: address.full_name.clone(),
            address_line1: address.address_line1.clone(),
            address_line2: address.address_line2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            phone: address.phone.to_string(),
            email: address.email.to_string(),
        }
    }
}

/// A validated delivery address. All values are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: PhoneNumber,
    pub email: Email,
}

fn required(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    message: &str,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
    }
    trimmed.to_owned()
}

/// Validate the shipping form.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_shipping(form: &ShippingForm) -> Result<ShippingAddress, FieldErrors> {
    let mut errors = FieldErrors::new();

    let full_name = required(&mut errors, "fullName", &form.full_name, "Full name is required");
    let address_line1 = required(
        &mut errors,
        "addressLine1",
        &form.address_line1,
        "Address is required",
    );
    let city = required(&mut errors, "city", &form.city, "City is required");
    let state = required(&mut errors, "state", &form.state, "State/Province is required");
    let postal_code = required(
        &mut errors,
        "postalCode",
        &form.postal_code,
        "Postal code is required",
    );
    let country = required(&mut errors, "country", &form.country, "Country is required");

    let phone = form.phone.trim();
    let phone = if phone.is_empty() {
        errors.insert("phone", "Phone number is required");
        None
    } else {
        PhoneNumber::parse(phone)
            .inspect_err(|_| errors.insert("phone", "Please enter a valid phone number"))
            .ok()
    };

    let email = form.email.trim();
    let email = if email.is_empty() {
        errors.insert("email", "Email is required");
        None
    } else {
        Email::parse(email)
            .inspect_err(|_| errors.insert("email", "Please enter a valid email address"))
            .ok()
    };

    let address_line2 = form
        .address_line2
        .as_deref()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned);

    match (phone, email) {
        (Some(phone), Some(email)) if errors.is_empty() => Ok(ShippingAddress {
            full_name,
            address_line1,
            address_line2,
            city,
            state,
            postal_code,
            country,
            phone,
            email,
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Raw payment form input.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentForm {
    #[serde(alias = "paymentMethod")]
    pub method: PaymentMethod,
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentForm")
            .field("method", &self.method)
            .field("cardholder_name", &self.cardholder_name)
            .field("expiry_date", &self.expiry_date)
            .finish_non_exhaustive()
    }
}

impl PaymentForm {
    /// A cash-on-delivery form.
    #[must_use]
    pub fn cash_on_delivery() -> Self {
        Self {
            method: PaymentMethod::CashOnDelivery,
            ..Self::default()
        }
    }
}

/// Card details held for the order. Never serialized.
#[derive(Debug, Clone)]
pub struct CreditCardInfo {
    /// Sixteen digits in groups of four.
    pub card_number: SecretString,
    pub cardholder_name: String,
    /// `MM/YY`.
    pub expiry_date: String,
    pub cvv: SecretString,
}

impl CreditCardInfo {
    /// Last four digits of the card number.
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let start = digits.len().saturating_sub(4);
        digits.iter().skip(start).collect()
    }

    /// What the review and confirmation steps may show.
    #[must_use]
    pub fn summary(&self) -> CardSummary {
        let last_four = self.last_four();
        CardSummary {
            masked_number: format!("**** **** **** {last_four}"),
            last_four,
            cardholder_name: self.cardholder_name.clone(),
            expiry_date: self.expiry_date.clone(),
        }
    }
}

/// Masked card details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub last_four: String,
    pub masked_number: String,
    pub cardholder_name: String,
    pub expiry_date: String,
}

/// A validated payment choice.
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    /// Present exactly when `method` is a credit card.
    pub card: Option<CreditCardInfo>,
}

fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Strip non-digits, keep at most 16 and group by four: `"4111 1111 1111 1111"`.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits = digits(input, CARD_NUMBER_DIGITS);
    let mut out = String::with_capacity(digits.len() + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Strip non-digits, keep at most four and insert the slash: `"1226"` → `"12/26"`.
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let digits = digits(input, 4);
    match (digits.get(..2), digits.get(2..)) {
        (Some(month), Some(year)) if !year.is_empty() => format!("{month}/{year}"),
        _ => digits,
    }
}

/// Strip non-digits and keep at most four.
#[must_use]
pub fn sanitize_cvv(input: &str) -> String {
    digits(input, 4)
}

/// Check a normalized `MM/YY` expiry against the current month.
fn expiry_error(expiry: &str, today: NaiveDate) -> Option<&'static str> {
    const INVALID: &str = "Please enter a valid expiry date (MM/YY)";

    if expiry.trim().is_empty() {
        return Some("Expiry date is required");
    }
    if !EXPIRY_RE.is_match(expiry) {
        return Some(INVALID);
    }

    let Some((month, year)) = expiry.split_once('/') else {
        return Some(INVALID);
    };
    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<i32>()) else {
        return Some(INVALID);
    };
    if !(1..=12).contains(&month) {
        return Some(INVALID);
    }

    let current_year = today.year() % 100;
    let current_month = today.month();
    if year < current_year || (year == current_year && month < current_month) {
        return Some("Card has expired");
    }

    None
}

/// Validate the payment form as of `today`.
///
/// Cash on delivery always passes. Card fields are normalized the way the
/// form formats them while typing before they are checked.
///
/// # Errors
///
/// Returns every failing card field with its message.
pub fn validate_payment(
    form: &PaymentForm,
    today: NaiveDate,
) -> Result<PaymentDetails, FieldErrors> {
    if form.method == PaymentMethod::CashOnDelivery {
        return Ok(PaymentDetails {
            method: PaymentMethod::CashOnDelivery,
            card: None,
        });
    }

    let mut errors = FieldErrors::new();

    let card_number = format_card_number(&form.card_number);
    if card_number.is_empty() {
        errors.insert("cardNumber", "Card number is required");
    } else if card_number.chars().filter(char::is_ascii_digit).count() < CARD_NUMBER_DIGITS {
        errors.insert("cardNumber", "Please enter a valid 16-digit card number");
    }

    let cardholder_name = form.cardholder_name.trim().to_owned();
    if cardholder_name.is_empty() {
        errors.insert("cardholderName", "Cardholder name is required");
    }

    let expiry_date = format_expiry(&form.expiry_date);
    if let Some(message) = expiry_error(&expiry_date, today) {
        errors.insert("expiryDate", message);
    }

    let cvv = sanitize_cvv(&form.cvv);
    if cvv.is_empty() {
        errors.insert("cvv", "CVV is required");
    } else if cvv.len() < 3 {
        errors.insert("cvv", "Please enter a valid CVV");
    }

    errors.into_result(|| PaymentDetails {
        method: PaymentMethod::CreditCard,
        card: Some(CreditCardInfo {
            card_number: SecretString::from(card_number),
            cardholder_name,
            expiry_date,
            cvv: SecretString::from(cvv),
        }),
    })
}
