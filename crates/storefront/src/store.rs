//! The cart store.
//!
//! [`CartStore`] holds the session's cart and is the only way to change it.
//! Each operation reads the current cart, validates the change against live
//! stock, persists the resulting snapshot and only then publishes the new
//! cart. A rejected operation notifies the user and leaves everything as it
//! was.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CartStore::restore(catalog, storage, notifier, DEFAULT_STORAGE_KEY).await;
//!
//! store.add_product(ProductId::new(1)).await;
//! store
//!     .update_product_amount(UpdateProductAmount {
//!         product_id: ProductId::new(1),
//!         amount: 3,
//!     })
//!     .await;
//! store.remove_product(ProductId::new(1)).await;
//!
//! let cart = store.cart();
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::{Cart, ProductId};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::error::{CartError, CartOperation};
use crate::notify::Notifier;
use crate::snapshot;
use crate::storage::{CartStorage, StorageError};

/// Arguments for [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    /// Product whose line changes.
    pub product_id: ProductId,
    /// Requested number of units. Values below 1 are rejected.
    pub amount: i64,
}

/// Session cart backed by a catalog, a storage and a notifier.
///
/// Cheaply cloneable; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn CartStorage>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    cart: RwLock<Arc<Cart>>,
    // Held for the whole read-validate-persist-publish sequence.
    write_gate: Mutex<()>,
}

impl CartStore {
    /// Create a store, restoring the cart persisted under `storage_key`.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart.
    pub async fn restore(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn CartStorage>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();

        let stored = storage.get(&storage_key).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, key = %storage_key, "Failed to read stored cart");
            None
        });
        let cart = snapshot::decode_or_empty(stored.as_deref());
        info!(items = cart.len(), key = %storage_key, "Cart restored");

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                notifier,
                storage_key,
                cart: RwLock::new(Arc::new(cart)),
                write_gate: Mutex::new(()),
            }),
        }
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(
            &self
                .inner
                .cart
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gains one unit if stock allows; a new
    /// product is looked up and appended with a single unit.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        let _gate = self.inner.write_gate.lock().await;
        let current = self.cart();

        let outcome = async {
            let next = self.with_added(&current, product_id).await?;
            self.commit(next, CartOperation::Add).await
        }
        .await;

        self.report(outcome);
    }

    /// Remove a product's line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let _gate = self.inner.write_gate.lock().await;
        let current = self.cart();

        let outcome = async {
            let next = current.without(product_id).ok_or(CartError::NotInCart {
                operation: CartOperation::Remove,
                product_id,
            })?;
            self.commit(next, CartOperation::Remove).await
        }
        .await;

        self.report(outcome);
    }

    /// Set a product's line to an exact number of units.
    ///
    /// Amounts below 1 are rejected without a lookup; use
    /// [`remove_product`](Self::remove_product) to drop a line.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        let _gate = self.inner.write_gate.lock().await;
        let current = self.cart();

        let outcome = async {
            let next = self.with_amount(&current, request).await?;
            self.commit(next, CartOperation::UpdateAmount).await
        }
        .await;

        self.report(outcome);
    }

    async fn with_added(&self, current: &Cart, product_id: ProductId) -> Result<Cart, CartError> {
        const OPERATION: CartOperation = CartOperation::Add;

        let Some(item) = current.get(product_id) else {
            let product = self
                .inner
                .catalog
                .product(product_id)
                .await
                .map_err(|source| CartError::Lookup {
                    operation: OPERATION,
                    source,
                })?;
            return Ok(current.with_product(product));
        };

        let stock = self
            .inner
            .catalog
            .stock(product_id)
            .await
            .map_err(|source| CartError::Lookup {
                operation: OPERATION,
                source,
            })?;

        let amount = item
            .amount
            .checked_add(1)
            .filter(|&amount| stock.covers(amount))
            .ok_or(CartError::StockExceeded {
                product_id,
                requested: u64::from(item.amount) + 1,
                available: stock.amount,
            })?;

        current
            .with_amount(product_id, amount)
            .ok_or(CartError::NotInCart {
                operation: OPERATION,
                product_id,
            })
    }

    async fn with_amount(
        &self,
        current: &Cart,
        request: UpdateProductAmount,
    ) -> Result<Cart, CartError> {
        const OPERATION: CartOperation = CartOperation::UpdateAmount;
        let UpdateProductAmount { product_id, amount } = request;

        if amount < 1 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }
        if !current.contains(product_id) {
            return Err(CartError::NotInCart {
                operation: OPERATION,
                product_id,
            });
        }

        let stock = self
            .inner
            .catalog
            .stock(product_id)
            .await
            .map_err(|source| CartError::Lookup {
                operation: OPERATION,
                source,
            })?;

        let amount = u32::try_from(amount)
            .ok()
            .filter(|&amount| stock.covers(amount))
            .ok_or(CartError::StockExceeded {
                product_id,
                requested: amount.unsigned_abs(),
                available: stock.amount,
            })?;

        current
            .with_amount(product_id, amount)
            .ok_or(CartError::NotInCart {
                operation: OPERATION,
                product_id,
            })
    }

    /// Persist `next` and publish it as the current cart.
    async fn commit(&self, next: Cart, operation: CartOperation) -> Result<(), CartError> {
        let persist_error = |source: StorageError| CartError::Persist { operation, source };

        let encoded = snapshot::encode(&next).map_err(|e| persist_error(e.into()))?;
        self.inner
            .storage
            .set(&self.inner.storage_key, &encoded)
            .await
            .map_err(persist_error)?;

        debug!(items = next.len(), quantity = next.total_quantity(), "Cart updated");
        *self
            .inner
            .cart
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        Ok(())
    }

    fn report(&self, outcome: Result<(), CartError>) {
        let Err(e) = outcome else {
            return;
        };

        match &e {
            CartError::Lookup { .. } | CartError::Persist { .. } => {
                tracing::error!(error = %e, "Cart operation failed");
            }
            CartError::StockExceeded { .. }
            | CartError::NotInCart { .. }
            | CartError::InvalidAmount { .. } => {
                info!(error = %e, "Cart operation rejected");
            }
        }

        self.inner.notifier.error(e.user_message());
    }
}
