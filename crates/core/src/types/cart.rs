//! Cart line items and the cart collection.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s, unique by product ID, kept in
//! insertion order. Every item holds at least one unit.
//!
//! Carts are values: the transforms below (`with_product`, `with_amount`,
//! `without`) never touch `self` and return a new cart instead, so a snapshot
//! handed out earlier can never change underneath its holder.

use serde::{Deserialize, Serialize, Serializer};

use super::{Price, Product, ProductId};

/// Errors raised when a list of items would break cart invariants.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartInvariantError {
    /// The same product appears twice.
    #[error("product {0} appears more than once")]
    DuplicateItem(ProductId),
    /// An item holds zero units.
    #[error("product {0} has a zero amount")]
    ZeroAmount(ProductId),
}

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
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
    /// Units in the cart, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Create a line holding a single unit of `product`.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }

    /// Line price (unit price times amount), or `None` if it overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.price.checked_times(self.amount)
    }
}

/// The shopping cart.
///
/// Serializes as a plain JSON array of items. Deserializing validates the
/// same invariants as [`Cart::try_from_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from items of unknown provenance.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError` if an ID repeats or an amount is zero.
    pub fn try_from_items(items: Vec<CartItem>) -> Result<Self, CartInvariantError> {
        for (index, item) in items.iter().enumerate() {
            if item.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(item.id));
            }
            if items.iter().take(index).any(|earlier| earlier.id == item.id) {
                return Err(CartInvariantError::DuplicateItem(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the cart holds a line for `id`.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals, or `None` if any step overflows.
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |total, item| total.checked_add(item.subtotal()?))
    }

    /// A copy of this cart with one unit of `product` appended as a new line.
    ///
    /// An existing line for the product wins: the copy is then identical to
    /// `self`. Use [`with_amount`](Self::with_amount) to change a quantity.
    #[must_use]
    pub fn with_product(&self, product: Product) -> Self {
        if self.contains(product.id) {
            return self.clone();
        }
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(CartItem::from_product(product));
        Self { items }
    }

    /// A copy of this cart with the line for `id` set to `amount` units.
    ///
    /// Returns `None` when `id` is not in the cart or `amount` is zero.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    CartItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Some(Self { items })
    }

    /// A copy of this cart without the line for `id`.
    ///
    /// Returns `None` when `id` is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Some(Self { items })
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Self::try_from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: i32, amount: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            title: format!("Shoe {id}"),
            price: Price::from_cents(10_000 + i64::from(id)),
            image: format!("https://example.com/{id}.jpg"),
            amount,
        }
    }

    fn cart(items: &[(i32, u32)]) -> Cart {
        Cart::try_from_items(items.iter().map(|&(id, amount)| item(id, amount)).collect())
            .unwrap()
    }

    #[test]
    fn test_try_from_items_rejects_duplicates() {
        let result = Cart::try_from_items(vec![item(1, 1), item(2, 1), item(1, 3)]);
        assert_eq!(
            result,
            Err(CartInvariantError::DuplicateItem(ProductId::new(1)))
        );
    }

    #[test]
    fn test_try_from_items_rejects_zero_amount() {
        let result = Cart::try_from_items(vec![item(1, 0)]);
        assert_eq!(result, Err(CartInvariantError::ZeroAmount(ProductId::new(1))));
    }

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Shoe {id}"),
            price: Price::from_cents(10_000 + i64::from(id)),
            image: format!("https://example.com/{id}.jpg"),
        }
    }

    #[test]
    fn test_with_product_appends_in_order() {
        let original = cart(&[(3, 1), (1, 2)]);
        let updated = original.with_product(product(2));

        let ids: Vec<i32> = updated.iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(updated.get(ProductId::new(2)), Some(&item(2, 1)));
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn test_with_product_keeps_existing_line() {
        let original = cart(&[(1, 4)]);
        assert_eq!(original.with_product(product(1)), original);
    }

    #[test]
    fn test_with_amount_leaves_original_untouched() {
        let original = cart(&[(1, 1), (2, 4)]);
        let updated = original.with_amount(ProductId::new(1), 5).unwrap();

        assert_eq!(updated.get(ProductId::new(1)).unwrap().amount, 5);
        assert_eq!(updated.get(ProductId::new(2)).unwrap().amount, 4);
        assert_eq!(original.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_with_amount_missing_or_zero() {
        let original = cart(&[(1, 1)]);
        assert!(original.with_amount(ProductId::new(9), 2).is_none());
        assert!(original.with_amount(ProductId::new(1), 0).is_none());
    }

    #[test]
    fn test_without_keeps_remaining_order() {
        let original = cart(&[(1, 1), (2, 2), (3, 3)]);
        let updated = original.without(ProductId::new(2)).unwrap();

        assert_eq!(updated, cart(&[(1, 1), (3, 3)]));
        assert!(original.without(ProductId::new(7)).is_none());
    }

    #[test]
    fn test_totals() {
        let c = cart(&[(1, 2), (2, 3)]);
        assert_eq!(c.total_quantity(), 5);
        assert_eq!(c.total(), Some(Price::from_cents(50_008)));
        assert_eq!(Cart::new().total(), Some(Price::ZERO));
    }

    #[test]
    fn test_totals_overflow_is_none() {
        let json = r#"[{"id": 1, "title": "A", "price": "79228162514264337593543950335", "image": "", "amount": 2}]"#;
        let c: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(c.len(), 1);
        assert_eq!(c.items()[0].subtotal(), None);
        assert_eq!(c.total(), None);

        let single = c.with_amount(ProductId::new(1), 1).unwrap();
        assert!(single.total().is_some());
        assert_eq!(single.with_product(product(2)).total(), None);
    }

    #[test]
    fn test_serializes_as_array() {
        let c = cart(&[(1, 2)]);
        let value = serde_json::to_value(&c).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["amount"], 2);
        assert_eq!(value[0]["price"], "100.01");
    }

    #[test]
    fn test_deserialize_validates_invariants() {
        let json = r#"[
            {"id": 1, "title": "A", "price": 10, "image": "", "amount": 1},
            {"id": 1, "title": "A", "price": 10, "image": "", "amount": 2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
