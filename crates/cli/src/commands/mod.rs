//! Subcommand implementations.
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

pub mod cart;
pub mod catalog;
pub mod favorites;

use polished_core::{Product, ProductId};
use polished_storefront::catalog::Catalog;
use thiserror::Error;

/// Errors a command can report to the user.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No catalog product has this id.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The product exists but is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(String),

    /// Quantities must be positive when adding.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// Look up a catalog product, failing with [`CommandError::UnknownProduct`].
pub fn find_product<'a>(
    catalog: &'a Catalog,
    id: &str,
) -> Result<&'a Product, CommandError> {
    catalog
        .find(&ProductId::new(id))
        .ok_or_else(|| CommandError::UnknownProduct(id.to_owned()))
}

/// Join output lines, each terminated by a newline.
pub fn render<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().fold(String::new(), |mut out, line| {
        out.push_str(line.as_ref());
        out.push('\n');
        out
    })
}
