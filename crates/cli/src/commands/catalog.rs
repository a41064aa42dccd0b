//! `polished catalog` - browse the built-in catalog.

use polished_storefront::catalog::{Catalog, ProductQuery};
use polished_storefront::pricing::format_amount;

use super::{CommandError, find_product, render};

/// One row per matching product: id, name, price and category.
#[must_use]
pub fn list(catalog: &Catalog, query: &ProductQuery) -> String {
    let products = catalog.query(query);
    if products.is_empty() {
        return "No products match.\n".to_owned();
    }

    let lines: Vec<String> = products
        .iter()
        .map(|product| {
            format!(
                "{:<6} {:<28} {:>10}  {}",
                product.id.as_str(),
                product.name,
                format_amount(product.price),
                product.category
            )
        })
        .collect();
    render(&lines)
}

/// Full details of one product plus its related products.
///
/// # Errors
///
/// Returns [`CommandError::UnknownProduct`] if no product has `id`.
pub fn show(catalog: &Catalog, id: &str) -> Result<String, CommandError> {
    let product = find_product(catalog, id)?;

    let mut lines = vec![
        format!("{} ({})", product.name, product.id.as_str()),
        format!("Price:    {}", format_amount(product.price)),
        format!("Category: {}", product.category),
    ];
    if let Some(description) = &product.description {
        lines.push(String::new());
        lines.push(description.clone());
    }

    let related = catalog.related(&product.id);
    if !related.is_empty() {
        lines.push(String::new());
        lines.push("Related:".to_owned());
        lines.extend(
            related
                .iter()
                .map(|other| format!("  {:<6} {}", other.id.as_str(), other.name)),
        );
    }
    Ok(render(&lines))
}
