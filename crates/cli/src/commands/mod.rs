//! CLI command implementations.

pub mod cart;

use rocketshoes_storefront::config::ConfigError;
use rocketshoes_storefront::{CatalogError, StorageError};
use thiserror::Error;

/// Errors that abort a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog client error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
