//! Cart snapshot encoding.
//!
//! A snapshot is the whole cart as a JSON array of items:
//!
//! ```json
//! [{"id": 1, "title": "Tênis de Caminhada", "price": "179.9", "image": "...", "amount": 2}]
//! ```
//!
//! Decoding validates both the item schema and cart invariants. Prices may be
//! stored as numbers or decimal strings.

use rocketshoes_core::{Cart, CartInvariantError, CartItem};
use thiserror::Error;

/// Errors that can occur when decoding a stored snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not a JSON array of cart items.
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed items that do not make a valid cart.
    #[error("Invalid snapshot: {0}")]
    Invariant(#[from] CartInvariantError),
}

/// Encode a cart as a snapshot.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart)
}

/// Decode a snapshot.
///
/// # Errors
///
/// Returns `SnapshotError` if the input is not a valid cart.
pub fn decode(raw: &str) -> Result<Cart, SnapshotError> {
    let items: Vec<CartItem> = serde_json::from_str(raw)?;
    Ok(Cart::try_from_items(items)?)
}

/// Decode a stored snapshot, treating absent or invalid data as an empty cart.
#[must_use]
pub fn decode_or_empty(raw: Option<&str>) -> Cart {
    let Some(raw) = raw else {
        return Cart::new();
    };

    decode(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discarding unreadable cart snapshot");
        Cart::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{Price, ProductId};

    use super::*;

    fn sample_cart() -> Cart {
        Cart::try_from_items(vec![
            CartItem {
                id: ProductId::new(1),
                title: "Tênis de Caminhada Leve Confortável".to_string(),
                price: Price::from_cents(17990),
                image: "https://example.com/1.jpg".to_string(),
                amount: 2,
            },
            CartItem {
                id: ProductId::new(3),
                title: "Tênis Adidas Duramo Lite 2.0".to_string(),
                price: Price::from_cents(21990),
                image: "https://example.com/3.jpg".to_string(),
                amount: 1,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_encoded_snapshot_decodes_to_same_cart() {
        let cart = sample_cart();
        let decoded = decode(&encode(&cart).unwrap()).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_decode_accepts_numeric_prices() {
        let raw = r#"[{"id": 2, "title": "Runner", "price": 139.9, "image": "x.jpg", "amount": 3}]"#;
        let cart = decode(raw).unwrap();
        let item = cart.get(ProductId::new(2)).unwrap();
        assert_eq!(item.price, Price::from_cents(13990));
        assert_eq!(item.amount, 3);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(matches!(decode(r#"{"id": 1}"#), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let raw = r#"[{"id": 2, "amount": 3}]"#;
        assert!(matches!(decode(raw), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_zero_amount() {
        let raw = r#"[{"id": 2, "title": "Runner", "price": 1, "image": "", "amount": 0}]"#;
        assert!(matches!(
            decode(raw),
            Err(SnapshotError::Invariant(CartInvariantError::ZeroAmount(_)))
        ));
    }

    #[test]
    fn test_decode_or_empty() {
        assert!(decode_or_empty(None).is_empty());
        assert!(decode_or_empty(Some("garbage")).is_empty());
        assert!(decode_or_empty(Some("[]")).is_empty());
        assert_eq!(
            decode_or_empty(Some(&encode(&sample_cart()).unwrap())),
            sample_cart()
        );
    }
}
