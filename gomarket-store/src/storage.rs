//! Key-value storage backends.
//!
//! - [`MemoryStorage`] - In-process map, shared between clones
//! - [`FileStorage`] - One file per key under a directory

use gomarket_core::{CoreError, KeyValueStorage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::CartConfig;
use crate::error::StoreError;
use crate::persistence::{read_optional, write_atomic};

/// File extension used for stored values.
const VALUE_EXTENSION: &str = "json";

// ============================================================================
// Memory Storage
// ============================================================================

/// In-memory key-value storage.
///
/// Clones share the same map, so a test can hold one handle while the store
/// writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// File Storage
// ============================================================================

/// File-backed key-value storage.
///
/// Each key maps to one file in `dir`. Keys are percent-encoded into file
/// names, so `@GoMarketPlace` is stored as `%40GoMarketPlace.json`. Writes
/// are atomic and owner-only.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a storage rooted at the configured directory.
    pub fn from_config(config: &CartConfig) -> Self {
        Self::new(config.storage_path())
    }

    /// Returns the root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{VALUE_EXTENSION}", encode_key(key)))
    }
}

impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key);
        debug!(key = %key, path = %path.display(), "Reading stored value");
        read_optional(&path).await.map_err(into_core)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        let path = self.path_for(key);
        debug!(key = %key, path = %path.display(), bytes = value.len(), "Writing stored value");
        write_atomic(&path, &value).await.map_err(into_core)
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9_-]`.
///
/// `.` is encoded too, so no key can produce `.` or `..`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

fn into_core(err: StoreError) -> CoreError {
    match err {
        StoreError::Io(e) => CoreError::Io(e),
        StoreError::Serialization(e) => CoreError::Serialization(e),
        other => CoreError::Storage(other.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
