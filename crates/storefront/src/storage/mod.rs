//! Key-value persistence for cart snapshots.
//!
//! - [`CartStorage`] is the port the cart store writes through
//! - [`FileStorage`] keeps every key in one JSON file on disk
//! - [`MemoryStorage`] keeps keys in process memory
//!
//! Values are opaque strings; the cart store owns the snapshot format
//! (see [`crate::snapshot`]).

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid key-value document.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string key-value store that survives restarts.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
