//! Product and stock lookups.
//!
//! # Architecture
//!
//! - [`Catalog`] is the port the cart store depends on
//! - [`HttpCatalog`] talks to the JSON catalog API (`/products/{id}`, `/stock/{id}`)
//! - Product records are cached in memory via `moka`; stock is always fetched live
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::catalog::{Catalog, HttpCatalog};
//!
//! let catalog = HttpCatalog::new(&config.catalog)?;
//!
//! let product = catalog.product(ProductId::new(1)).await?;
//! let stock = catalog.stock(product.id).await?;
//! ```

mod http;

pub use http::HttpCatalog;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockInfo};
use thiserror::Error;

/// Errors that can occur when looking up catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API has no record for the product.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Source of product details and live stock levels.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the current stock level for a product.
    async fn stock(&self, id: ProductId) -> Result<StockInfo, CatalogError>;

    /// Fetch a product's display record.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound(ProductId::new(12));
        assert_eq!(err.to_string(), "Not found: product 12");

        let err = CatalogError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
    }
}
