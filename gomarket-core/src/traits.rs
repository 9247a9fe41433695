//! Trait definitions for GoMarketplace.
//!
//! This module defines the storage seam the cart persists through.

use std::future::Future;

use crate::error::CoreError;

/// A string key-value store on the local device.
///
/// Implementors are responsible for:
/// - Returning `None` for keys that were never written
/// - Replacing the whole value on `set` (no partial updates)
///
/// The cart reads its key once at startup and overwrites it after every
/// mutation.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Deletes the value stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}
