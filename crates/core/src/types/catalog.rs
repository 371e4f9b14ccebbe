//! Catalog records served by the product API.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as listed in the catalog.
///
/// Carries only the display attributes the cart needs; unknown fields in API
/// payloads are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    #[serde(alias = "name")]
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

/// Available quantity for a product, as reported by the stock endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Catalog product ID.
    pub id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl StockInfo {
    /// Whether `requested` units can be taken from this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_api_payload() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe1.jpg",
            "brand": "ignored"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
        assert_eq!(product.image, "https://example.com/shoe1.jpg");
    }

    #[test]
    fn test_product_accepts_name_alias() {
        let json = r#"{"id": 2, "name": "Runner", "price": "99.00"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.title, "Runner");
        assert!(product.image.is_empty());
    }

    #[test]
    fn test_stock_covers() {
        let stock = StockInfo {
            id: ProductId::new(1),
            amount: 3,
        };
        assert!(stock.covers(3));
        assert!(!stock.covers(4));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let result = serde_json::from_str::<StockInfo>(r#"{"id": 1, "amount": -2}"#);
        assert!(result.is_err());
    }
}
