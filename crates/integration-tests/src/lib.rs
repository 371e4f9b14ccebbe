//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! The tests run the cart store against its production adapters: the HTTP
//! catalog client talks to a `wiremock` server standing in for the catalog
//! API, and snapshots go to a `FileStorage` inside a temporary directory.
//!
//! This library holds the shared fixtures.

use std::path::PathBuf;
use std::sync::Arc;

use rocketshoes_core::ProductId;
use rocketshoes_storefront::config::DEFAULT_STORAGE_KEY;
use rocketshoes_storefront::{
    CartStore, CatalogConfig, ChannelNotifier, FileStorage, HttpCatalog,
};
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Catalog fixture entry: `(id, title, price, stock)`.
pub type CatalogEntry = (i32, &'static str, f64, u32);

/// A small shoe catalog.
pub const SHOES: &[CatalogEntry] = &[
    (1, "Tênis de Caminhada Leve Confortável", 179.9, 3),
    (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
    (3, "Tênis Adidas Duramo Lite 2.0", 219.9, 2),
];

/// Start a mock catalog API serving `entries` under `/products/{id}` and `/stock/{id}`.
///
/// Unknown IDs get the mock server's default 404.
pub async fn start_catalog(entries: &[CatalogEntry]) -> MockServer {
    let server = MockServer::start().await;

    for &(id, title, price, stock) in entries {
        Mock::given(method("GET"))
            .and(path(format!("/products/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/stock/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": id, "amount": stock})),
            )
            .mount(&server)
            .await;
    }

    server
}

/// A cart session wired to a mock catalog and a storage file.
pub struct Session {
    pub store: CartStore,
    pub notices: UnboundedReceiver<String>,
}

impl Session {
    /// Restore a session from `storage_path` against the catalog at `server`.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    #[allow(clippy::unwrap_used)]
    pub async fn open(server: &MockServer, storage_path: impl Into<PathBuf>) -> Self {
        let config = CatalogConfig::new(Url::parse(&server.uri()).unwrap());
        let catalog = HttpCatalog::new(&config).unwrap();
        let (notifier, notices) = ChannelNotifier::new();

        let store = CartStore::restore(
            Arc::new(catalog),
            Arc::new(FileStorage::new(storage_path)),
            Arc::new(notifier),
            DEFAULT_STORAGE_KEY,
        )
        .await;

        Self { store, notices }
    }

    /// Drain pending notifications.
    pub fn drain_notices(&mut self) -> Vec<String> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            notices.push(notice);
        }
        notices
    }

    /// `(id, amount)` pairs of the current cart, in order.
    #[must_use]
    pub fn amounts(&self) -> Vec<(i32, u32)> {
        self.store
            .cart()
            .iter()
            .map(|item| (item.id.as_i32(), item.amount))
            .collect()
    }

    /// Add each product once, in order.
    pub async fn add_all(&self, ids: &[i32]) {
        for &id in ids {
            self.store.add_product(ProductId::new(id)).await;
        }
    }
}
