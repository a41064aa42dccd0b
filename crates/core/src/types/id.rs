//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Order numbers have a
//! fixed shape and get their own validated type, [`OrderId`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use polished_core::define_id;
/// define_id!(SkuId);
/// define_id!(CategoryId);
///
/// let sku = SkuId::new("np-001");
/// let category = CategoryId::new("np-001");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = category;
/// assert_eq!(sku.as_str(), category.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);

/// Errors that can occur when building or parsing an [`OrderId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderIdError {
    /// The string does not start with `ORD-`.
    #[error("order id must start with {prefix}")]
    MissingPrefix {
        /// Expected prefix.
        prefix: &'static str,
    },
    /// The part after the prefix is not exactly six ASCII digits.
    #[error("order id must end with {digits} digits")]
    InvalidDigits {
        /// Required digit count.
        digits: usize,
    },
    /// The sequence number does not fit in six digits.
    #[error("order sequence {0} exceeds {max}", max = OrderId::MAX_SEQUENCE)]
    SequenceOutOfRange(u32),
}

/// A synthetic order number of the form `ORD-000000`.
///
/// Only 10^6 values exist and nothing remembers which ones were issued, so
/// two orders can share a number. That is acceptable while there is no order
/// backend; anything that stores orders needs a collision-free scheme.
///
/// ```
/// use polished_core::OrderId;
///
/// let id = OrderId::from_sequence(42).unwrap();
/// assert_eq!(id.as_str(), "ORD-000042");
/// assert_eq!(OrderId::parse("ORD-000042").unwrap(), id);
/// assert!(OrderId::parse("ORD-42").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

impl OrderId {
    /// Prefix shared by every order number.
    pub const PREFIX: &'static str = "ORD-";
    /// Number of digits after the prefix.
    pub const DIGITS: usize = 6;
    /// Largest sequence number that fits.
    pub const MAX_SEQUENCE: u32 = 999_999;

    /// Build an order id from a sequence number in `0..=999_999`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderIdError::SequenceOutOfRange`] for larger values.
    pub fn from_sequence(sequence: u32) -> Result<Self, OrderIdError> {
        if sequence > Self::MAX_SEQUENCE {
            return Err(OrderIdError::SequenceOutOfRange(sequence));
        }
        Ok(Self(format!(
            "{}{sequence:0width$}",
            Self::PREFIX,
            width = Self::DIGITS
        )))
    }

    /// Parse an order id such as `ORD-004217`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing or the remainder is not
    /// exactly six ASCII digits.
    pub fn parse(s: &str) -> Result<Self, OrderIdError> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or(OrderIdError::MissingPrefix {
                prefix: Self::PREFIX,
            })?;

        if digits.len() != Self::DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderIdError::InvalidDigits {
                digits: Self::DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the order id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric part of the order id.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.0
            .get(Self::PREFIX.len()..)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = OrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderId {
    type Error = OrderIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.0
    }
}
