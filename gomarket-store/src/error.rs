//! Store error types.

use gomarket_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cart was used outside a mounted `CartProvider`.
    #[error("Cart used outside of a CartProvider")]
    NotInitialized,

    /// No cart line with this id.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The item descriptor was rejected.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Writing the cart to storage failed. The in-memory cart keeps the change.
    #[error("Failed to persist cart under {key}: {source}")]
    Persist {
        /// Storage key that was being written.
        key: String,
        /// Underlying storage error.
        #[source]
        source: CoreError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other core error.
    #[error(transparent)]
    Core(CoreError),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Persist { .. } | StoreError::Io(_))
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => StoreError::ItemNotFound(id),
            CoreError::InvalidData(msg) => StoreError::InvalidItem(msg),
            CoreError::Io(e) => StoreError::Io(e),
            CoreError::Serialization(e) => StoreError::Serialization(e),
            other @ CoreError::Storage(_) => StoreError::Core(other),
        }
    }
}
