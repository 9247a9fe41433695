//! Main cart state store.
//!
//! Holds the cart in memory, hydrates it once from storage, and writes the
//! full cart back after every mutation. Subscribers are notified through a
//! watch channel so UI components can re-render.

use chrono::{DateTime, Utc};
use gomarket_core::{Cart, CartItem, CoreError, KeyValueStorage, NewCartItem};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::error::StoreError;

// ============================================================================
// Inner State
// ============================================================================

/// Internal state for the cart store.
#[derive(Debug, Default)]
struct CartStoreInner {
    /// The cart itself.
    cart: Cart,
    /// Whether hydration has run.
    loaded: bool,
    /// Last successful persist.
    last_saved: Option<DateTime<Utc>>,
    /// Change counter published to subscribers.
    version: u64,
}

impl CartStoreInner {
    fn bump(&mut self, notify: &watch::Sender<u64>) {
        self.version += 1;
        notify.send_replace(self.version);
    }
}

// ============================================================================
// Cart Store
// ============================================================================

/// Cart state with persistence and change notifications.
///
/// Mutations hold the write lock across the storage write, so concurrent
/// calls are applied and persisted one at a time, in order.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    inner: RwLock<CartStoreInner>,
    notify: watch::Sender<u64>,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Creates an empty, not yet hydrated store.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            storage,
            key: key.into(),
            inner: RwLock::new(CartStoreInner::default()),
            notify,
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ========================================================================
    // Hydration
    // ========================================================================

    /// Hydrates the cart from storage.
    ///
    /// Runs once; later calls return immediately. A stored blob replaces the
    /// in-memory cart. A missing, unreadable, or malformed blob leaves the
    /// cart as it is and is only logged.
    pub async fn load(&self) {
        let mut inner = self.inner.write().await;
        if inner.loaded {
            debug!(key = %self.key, "Cart already loaded");
            return;
        }
        inner.loaded = true;

        match self.storage.get(&self.key).await {
            Ok(Some(blob)) => match Cart::from_json(&blob) {
                Ok(cart) => {
                    info!(key = %self.key, items = cart.len(), "Cart hydrated from storage");
                    inner.cart = cart;
                    inner.bump(&self.notify);
                }
                Err(e) => {
                    warn!(
                        key = %self.key,
                        error = %e,
                        blob = %blob,
                        "Stored cart is malformed, starting empty"
                    );
                }
            },
            Ok(None) => {
                debug!(key = %self.key, "No stored cart, starting empty");
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart, starting empty");
            }
        }
    }

    /// Returns true once hydration has run.
    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.loaded
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds one unit of a product, appending it if it is not in the cart yet.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidItem`] for a NaN or infinite price, which
    /// could not be written to the blob, and [`StoreError::Persist`] if the
    /// write fails (the cart keeps the change).
    pub async fn add_to_cart(&self, item: NewCartItem) -> Result<u32, StoreError> {
        item.validate()?;

        let id = item.id.clone();
        let quantity = self.mutate(|cart| Ok(cart.add(item))).await?;
        debug!(id = %id, quantity, "Added to cart");
        Ok(quantity)
    }

    /// Adds one unit to an existing line.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] if no line has this id (nothing
    /// changes, nothing is written), or [`StoreError::Persist`] if the write
    /// fails.
    pub async fn increment(&self, id: &str) -> Result<u32, StoreError> {
        let quantity = self.mutate(|cart| cart.increment(id)).await?;
        debug!(id = %id, quantity, "Incremented cart item");
        Ok(quantity)
    }

    /// Removes one unit from an existing line; the line is dropped at zero.
    ///
    /// Returns the remaining quantity, zero if the line was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] if no line has this id (nothing
    /// changes, nothing is written), or [`StoreError::Persist`] if the write
    /// fails.
    pub async fn decrement(&self, id: &str) -> Result<u32, StoreError> {
        let quantity = self.mutate(|cart| cart.decrement(id)).await?;
        if quantity == 0 {
            debug!(id = %id, "Removed item from cart");
        } else {
            debug!(id = %id, quantity, "Decremented cart item");
        }
        Ok(quantity)
    }

    /// Applies `f` to the cart and persists the result under the write lock.
    async fn mutate<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Cart) -> Result<T, CoreError>,
    {
        let mut inner = self.inner.write().await;
        let value = f(&mut inner.cart)?;
        inner.bump(&self.notify);

        let blob = inner.cart.to_json()?;
        match self.storage.set(&self.key, blob).await {
            Ok(()) => {
                inner.last_saved = Some(Utc::now());
                Ok(value)
            }
            Err(source) => {
                warn!(key = %self.key, error = %source, "Failed to persist cart");
                Err(StoreError::Persist {
                    key: self.key.clone(),
                    source,
                })
            }
        }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Returns the current items in cart order.
    pub async fn products(&self) -> Vec<CartItem> {
        self.inner.read().await.cart.items().to_vec()
    }

    /// Returns a copy of the whole cart.
    pub async fn cart(&self) -> Cart {
        self.inner.read().await.cart.clone()
    }

    /// Returns the line with this id.
    pub async fn get(&self, id: &str) -> Option<CartItem> {
        self.inner.read().await.cart.get(id).cloned()
    }

    /// Returns the time of the last successful write.
    pub async fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_saved
    }

    // ========================================================================
    // Observable
    // ========================================================================

    /// Subscribes to cart changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
