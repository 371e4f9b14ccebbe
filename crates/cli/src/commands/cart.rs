//! Cart commands.
//!
//! Each invocation is one cart session: the store is restored from the
//! storage file, at most one operation runs, and the resulting cart is
//! printed.

use std::sync::Arc;

use rocketshoes_core::{Cart, Price, ProductId};
use rocketshoes_storefront::{
    CartStorage, CartStore, FileStorage, HttpCatalog, StorefrontConfig, TracingNotifier,
    UpdateProductAmount,
};
use tracing::info;

use super::CliError;

/// Longest product title shown before truncation.
const TITLE_WIDTH: usize = 40;

/// Shown in place of an amount too large to compute.
const OVERFLOW: &str = "overflow";

/// Restore the cart session described by `config`.
///
/// # Errors
///
/// Returns an error if the catalog HTTP client cannot be built.
pub async fn open(config: &StorefrontConfig) -> Result<CartStore, CliError> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    let storage = FileStorage::new(&config.storage_path);

    Ok(CartStore::restore(
        Arc::new(catalog),
        Arc::new(storage),
        Arc::new(TracingNotifier),
        config.storage_key.as_str(),
    )
    .await)
}

/// Set a product's quantity.
pub async fn update(store: &CartStore, product_id: ProductId, amount: i64) {
    store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
}

/// Delete the saved cart.
///
/// # Errors
///
/// Returns an error if the storage file cannot be rewritten.
pub async fn clear(config: &StorefrontConfig) -> Result<(), CliError> {
    let storage = FileStorage::new(&config.storage_path);
    storage.remove(&config.storage_key).await?;
    info!(path = %storage.path().display(), "Cart cleared");
    Ok(())
}

/// Print the cart as a table.
#[allow(clippy::print_stdout)]
pub fn print(cart: &Cart) {
    for line in render(cart) {
        println!("{line}");
    }
}

fn render(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Your cart is empty.".to_string()];
    }

    let mut lines = Vec::with_capacity(cart.len() + 3);
    lines.push(format!(
        "{:>5}  {:<TITLE_WIDTH$}  {:>5}  {:>10}  {:>10}",
        "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
    ));
    for item in cart {
        lines.push(format!(
            "{:>5}  {:<TITLE_WIDTH$}  {:>5}  {:>10}  {:>10}",
            item.id.as_i32(),
            truncate(&item.title, TITLE_WIDTH),
            item.amount,
            item.price.to_string(),
            money(item.subtotal()),
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} product(s), {} unit(s), total {}",
        cart.len(),
        cart.total_quantity(),
        money(cart.total())
    ));
    lines
}

fn money(amount: Option<Price>) -> String {
    amount.map_or_else(|| OVERFLOW.to_string(), |price| price.to_string())
}

fn truncate(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        return title.to_string();
    }
    let mut short: String = title.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
