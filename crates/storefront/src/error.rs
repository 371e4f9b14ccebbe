//! Cart operation errors.
//!
//! Every failure of a cart operation is absorbed at the store boundary: it is
//! logged, turned into a user-facing message via [`CartError::user_message`],
//! and the cart is left untouched. Callers never receive these as `Err`.

use std::fmt;

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Shown when the requested quantity exceeds the available stock.
pub const MSG_STOCK_EXCEEDED: &str = "Requested quantity exceeds available stock";
/// Shown when adding a product fails.
pub const MSG_ADD_FAILED: &str = "Failed to add product";
/// Shown when removing a product fails.
pub const MSG_REMOVE_FAILED: &str = "Failed to remove product";
/// Shown when changing a product quantity fails.
pub const MSG_UPDATE_FAILED: &str = "Failed to update product quantity";

/// The cart mutation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => MSG_ADD_FAILED,
            Self::Remove => MSG_REMOVE_FAILED,
            Self::UpdateAmount => MSG_UPDATE_FAILED,
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::UpdateAmount => "update amount",
        })
    }
}

/// Why a cart operation was rejected.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is more than the stock holds.
    #[error("Stock exceeded for product {product_id}: requested {requested}, available {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("Product {product_id} is not in the cart ({operation})")]
    NotInCart {
        operation: CartOperation,
        product_id: ProductId,
    },

    /// A quantity below one was requested.
    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// Product or stock lookup failed.
    #[error("Catalog lookup failed ({operation}): {source}")]
    Lookup {
        operation: CartOperation,
        #[source]
        source: CatalogError,
    },

    /// The snapshot could not be encoded or written.
    #[error("Failed to persist cart ({operation}): {source}")]
    Persist {
        operation: CartOperation,
        #[source]
        source: StorageError,
    },
}

impl CartError {
    /// The message shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::StockExceeded { .. } => MSG_STOCK_EXCEEDED,
            Self::InvalidAmount { .. } => MSG_UPDATE_FAILED,
            Self::NotInCart { operation, .. }
            | Self::Lookup { operation, .. }
            | Self::Persist { operation, .. } => operation.failure_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let id = ProductId::new(1);

        let err = CartError::StockExceeded {
            product_id: id,
            requested: 2,
            available: 1,
        };
        assert_eq!(err.user_message(), MSG_STOCK_EXCEEDED);

        let err = CartError::InvalidAmount {
            product_id: id,
            amount: 0,
        };
        assert_eq!(err.user_message(), MSG_UPDATE_FAILED);

        let err = CartError::NotInCart {
            operation: CartOperation::Remove,
            product_id: id,
        };
        assert_eq!(err.user_message(), MSG_REMOVE_FAILED);

        let err = CartError::Lookup {
            operation: CartOperation::Add,
            source: CatalogError::NotFound(id),
        };
        assert_eq!(err.user_message(), MSG_ADD_FAILED);

        let err = CartError::Lookup {
            operation: CartOperation::UpdateAmount,
            source: CatalogError::NotFound(id),
        };
        assert_eq!(err.user_message(), MSG_UPDATE_FAILED);
    }

    #[test]
    fn test_cart_error_display() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(4),
            requested: 3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "Stock exceeded for product 4: requested 3, available 2"
        );

        let err = CartError::NotInCart {
            operation: CartOperation::UpdateAmount,
            product_id: ProductId::new(4),
        };
        assert_eq!(
            err.to_string(),
            "Product 4 is not in the cart (update amount)"
        );
    }
}
