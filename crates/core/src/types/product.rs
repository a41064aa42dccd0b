//! Catalog product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product.
///
/// Reference data: products come from the static catalog and are never
/// mutated. Cart lines and favorites embed a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price, never negative.
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_json_shape() {
        let product = Product {
            id: ProductId::new("1"),
            name: "Blush Crush Polish".to_string(),
            price: Decimal::new(1899, 2),
            image: "https://example.com/p.jpg".to_string(),
            category: "Polish".to_string(),
            description: None,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["name"], "Blush Crush Polish");
        assert!(value.get("description").is_none());

        let parsed: Product = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, product);
    }

    #[test]
    fn test_product_accepts_numeric_price() {
        let json = r#"{"id":"2","name":"Gold Rush","price":21.99,"image":"x","category":"Polish"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(2199, 2));
    }
}
