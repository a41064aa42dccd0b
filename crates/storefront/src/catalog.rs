//! Static product catalog.
//!
//! The catalog is compiled in and loaded once at startup. It is the boundary
//! the cart, favorites and checkout code consume; swapping it for a remote
//! source only has to keep [`Catalog`]'s lookups.

use std::cmp::Ordering;
use std::sync::Arc;

use polished_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Number of products shown in the featured strip.
pub const FEATURED_COUNT: usize = 4;

/// Maximum number of related products returned for a product.
pub const RELATED_COUNT: usize = 4;

/// `(id, name, price in paisa, pexels photo id, category, description)`
const BUILTIN_PRODUCTS: &[(&str, &str, i64, u32, &str, &str)] = &[
    ("1", "Blush Crush Polish", 1899, 2_253_834, "Polish", "A luxurious soft pink polish that complements any skin tone."),
    ("2", "Gold Rush Glitter", 2199, 3_997_386, "Polish", "Dazzling gold glitter polish for a statement manicure."),
    ("3", "Midnight Velvet", 1899, 457_701, "Polish", "Rich, deep black polish with a smooth, velvety finish."),
    ("4", "Pearl Essence", 1999, 2_977_272, "Polish", "Iridescent pearl finish for an elegant, timeless look."),
    ("5", "Couture Press-Ons", 3299, 704_815, "Press-ons", "Designer press-on nails in a classic French tip design."),
    ("6", "Stiletto Edge Press-Ons", 3699, 3_997_381, "Press-ons", "Bold, dramatic stiletto press-ons with edgy accents."),
    ("7", "Minimalist Matte Press-Ons", 3499, 939_836, "Press-ons", "Sophisticated matte press-ons in a natural almond shape."),
    ("8", "Ultimate Manicure Kit", 4899, 5_797_999, "Tools", "Professional-grade manicure set with premium tools."),
    ("9", "Nail Strengthening Treatment", 2299, 8_311_328, "Care", "Intensive treatment that strengthens brittle nails."),
    ("10", "Crystal Gem Nail Jewels", 1599, 7_763_818, "Art", "Luxury crystal embellishments for statement nail art."),
    ("11", "French Manicure Kit", 2999, 4_210_347, "Kits", "Everything you need for a perfect French manicure."),
    ("12", "Top & Base Coat Duo", 2499, 3_997_374, "Care", "Professional-quality top and base coats for a salon-perfect finish."),
];

fn pexels_image(photo_id: u32) -> String {
    format!(
        "https://images.pexels.com/photos/{photo_id}/pexels-photo-{photo_id}.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
    )
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    NameAz,
    NameZa,
}

/// Filters for a product listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact category name.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SortOption,
}

/// The product catalog, cheaply cloneable.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// The compiled-in storefront catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let products = BUILTIN_PRODUCTS
            .iter()
            .map(
                |&(id, name, paisa, photo_id, category, description)| Product {
                    id: ProductId::new(id),
                    name: name.to_owned(),
                    price: Decimal::new(paisa, 2),
                    image: pexels_image(photo_id),
                    category: category.to_owned(),
                    description: Some(description.to_owned()),
                },
            )
            .collect();

        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in self.products.iter() {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// The featured subset: the first few catalog entries.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        let end = FEATURED_COUNT.min(self.products.len());
        self.products.get(..end).unwrap_or_default()
    }

    /// Other products in the same category, excluding the product itself.
    #[must_use]
    pub fn related(&self, id: &ProductId) -> Vec<&Product> {
        let Some(product) = self.find(id) else {
            return Vec::new();
        };

        self.products
            .iter()
            .filter(|p| p.category == product.category && &p.id != id)
            .take(RELATED_COUNT)
            .collect()
    }

    /// Filter and sort the catalog.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = query.category.as_deref().filter(|c| !c.is_empty());

        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| p.name.to_lowercase().contains(n))
            })
            .filter(|p| category.is_none_or(|c| p.category == c))
            .collect();

        match query.sort {
            SortOption::Featured => {}
            SortOption::PriceLow => matches.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOption::PriceHigh => matches.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOption::NameAz => matches.sort_by(|a, b| compare_names(a, b)),
            SortOption::NameZa => matches.sort_by(|a, b| compare_names(b, a)),
        }

        matches
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn compare_names(a: &Product, b: &Product) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
