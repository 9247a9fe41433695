//! Cart provider scope.
//!
//! A [`CartProvider`] owns the session's [`CartStore`]. Consumers receive a
//! [`CartContext`] and resolve the store through [`use_cart`], which fails
//! with [`StoreError::NotInitialized`] when the context was never provided
//! or the provider has been dropped.

use gomarket_core::KeyValueStorage;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

use crate::cart_store::CartStore;
use crate::config::CartConfig;
use crate::error::StoreError;
use crate::storage::FileStorage;

// ============================================================================
// Provider
// ============================================================================

/// Owns the cart for one session.
pub struct CartProvider<S> {
    store: Arc<CartStore<S>>,
}

impl<S: KeyValueStorage> CartProvider<S> {
    /// Creates the store for `storage` and hydrates it.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid. Storage read failures
    /// are not errors; the cart simply starts empty.
    pub async fn mount(storage: S, config: &CartConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let store = CartStore::new(storage, config.storage_key.clone());
        store.load().await;
        info!(key = %config.storage_key, "Cart provider mounted");

        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Returns a context handle for consumers.
    pub fn context(&self) -> CartContext<S> {
        CartContext {
            store: Some(Arc::downgrade(&self.store)),
        }
    }

    /// Returns the store directly.
    pub fn store(&self) -> Arc<CartStore<S>> {
        Arc::clone(&self.store)
    }
}

impl CartProvider<FileStorage> {
    /// Mounts a file-backed cart using the configured directory and key.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub async fn open(config: &CartConfig) -> Result<Self, StoreError> {
        let storage = FileStorage::from_config(config);
        debug!(dir = %storage.dir().display(), "Opening file-backed cart");
        Self::mount(storage, config).await
    }
}

impl<S> Drop for CartProvider<S> {
    fn drop(&mut self) {
        debug!("Cart provider unmounted");
    }
}

// ============================================================================
// Context
// ============================================================================

/// Handle consumers use to reach the cart.
///
/// Holds a weak reference: once the provider is gone, the context no longer
/// resolves.
pub struct CartContext<S> {
    store: Option<Weak<CartStore<S>>>,
}

impl<S> CartContext<S> {
    /// A context with no provider above it.
    pub fn detached() -> Self {
        Self { store: None }
    }

    /// Returns true if the context still reaches a live provider.
    pub fn is_provided(&self) -> bool {
        self.store
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }
}

impl<S> Clone for CartContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> Default for CartContext<S> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<S> std::fmt::Debug for CartContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartContext")
            .field("provided", &self.is_provided())
            .finish()
    }
}

/// Resolves the cart store from a context.
///
/// # Errors
///
/// Returns [`StoreError::NotInitialized`] if the context is detached or its
/// provider has been dropped.
pub fn use_cart<S>(context: &CartContext<S>) -> Result<Arc<CartStore<S>>, StoreError> {
    context
        .store
        .as_ref()
        .and_then(Weak::upgrade)
        .ok_or(StoreError::NotInitialized)
}

// ============================================================================
// Tests
// ============================================================================
