//! Core error types for GoMarketplace.

use thiserror::Error;

/// Core error type for cart and storage operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cart line with this id.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Invalid data in a cart item or persisted blob.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error from a storage backend.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
