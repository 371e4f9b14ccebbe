//! RocketShoes Storefront - client-side cart state.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart and exposes add / remove / set-quantity
//! - [`catalog`] looks up products and live stock (HTTP API client)
//! - [`storage`] persists cart snapshots in a key-value store
//! - [`notify`] surfaces user-facing error messages
//!
//! The store depends on the three collaborators only through traits, so a
//! host (CLI, desktop shell, tests) wires in whichever adapters it needs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, CatalogError, HttpCatalog};
pub use config::{CatalogConfig, StorefrontConfig};
pub use error::{CartError, CartOperation};
pub use notify::{ChannelNotifier, Notifier, TracingNotifier};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, UpdateProductAmount};
