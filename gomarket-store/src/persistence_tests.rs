//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O helpers and the file-backed cart surviving a restart.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::cart_store::CartStore;
use crate::config::CartConfig;
use crate::persistence::{ensure_dir, load_json, load_json_or_default, save_json};
use crate::provider::{use_cart, CartProvider};
use crate::storage::FileStorage;
use gomarket_core::{Cart, KeyValueStorage, NewCartItem};

fn file_config(temp_dir: &TempDir) -> CartConfig {
    CartConfig {
        storage_dir: Some(temp_dir.path().join("storage")),
        ..CartConfig::default()
    }
}

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("cart.json");

    let mut cart = Cart::new();
    cart.add(NewCartItem::new("a", "Shirt", "", 10.0));

    save_json(&file_path, &cart).await.unwrap();
    let loaded: Cart = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, cart);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("cart.json");

    let data = serde_json::json!({"key": "value"});

    let result = save_json(&nested_path, &data).await;
    assert!(result.is_ok());
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/cart.json");

    let result: Result<Cart, _> = load_json(&file_path).await;
    assert!(result.is_err());

    let fallback: Cart = load_json_or_default(&file_path).await;
    assert!(fallback.is_empty());
}

#[tokio::test]
async fn test_ensure_dir_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dir_path = temp_dir.path().join("test_dir");

    ensure_dir(&dir_path).await.unwrap();
    ensure_dir(&dir_path).await.unwrap();

    assert!(dir_path.is_dir());
}

// ============================================================================
// File-Backed Cart Tests
// ============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);

    {
        let provider = CartProvider::open(&config).await.unwrap();
        let cart = use_cart(&provider.context()).unwrap();
        cart.add_to_cart(NewCartItem::new("a", "Shirt", "https://img/a.png", 10.0))
            .await
            .unwrap();
        cart.add_to_cart(NewCartItem::new("b", "Mug", "https://img/b.png", 4.5))
            .await
            .unwrap();
        cart.increment("b").await.unwrap();
    }

    let provider = CartProvider::open(&config).await.unwrap();
    let products = provider.store().products().await;

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, "a");
    assert_eq!(products[0].quantity, 1);
    assert_eq!(products[1].id, "b");
    assert_eq!(products[1].quantity, 2);
}

#[tokio::test]
async fn test_blob_written_under_configured_key() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);
    let storage = FileStorage::from_config(&config);

    let store = CartStore::new(storage.clone(), config.storage_key.clone());
    store.load().await;
    store
        .add_to_cart(NewCartItem::new("a", "Shirt", "", 10.0))
        .await
        .unwrap();

    let path = storage.path_for("@GoMarketPlace");
    assert!(path.ends_with("%40GoMarketPlace.json"));

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["id"], "a");
    assert_eq!(value[0]["quantity"], 1);
}

#[tokio::test]
async fn test_corrupt_file_loads_empty_then_recovers() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);
    let storage = FileStorage::from_config(&config);
    storage
        .set(&config.storage_key, "[{\"id\": truncated".to_string())
        .await
        .unwrap();

    let provider = CartProvider::mount(storage.clone(), &config).await.unwrap();
    let cart = provider.store();
    assert!(cart.products().await.is_empty());

    cart.add_to_cart(NewCartItem::new("a", "Shirt", "", 10.0))
        .await
        .unwrap();

    let blob = storage.get(&config.storage_key).await.unwrap().unwrap();
    assert_eq!(Cart::from_json(&blob).unwrap().len(), 1);
}

#[tokio::test]
async fn test_emptied_cart_persists_empty_array() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);
    let storage = FileStorage::from_config(&config);

    let provider = CartProvider::mount(storage.clone(), &config).await.unwrap();
    let cart = provider.store();
    cart.add_to_cart(NewCartItem::new("a", "Shirt", "", 10.0))
        .await
        .unwrap();
    cart.decrement("a").await.unwrap();

    let blob = storage.get(&config.storage_key).await.unwrap();
    assert_eq!(blob.as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_unicode_titles_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);

    {
        let provider = CartProvider::open(&config).await.unwrap();
        provider
            .store()
            .add_to_cart(NewCartItem::new("ç", "Camiseta 🚀 日本語", "", 59.9))
            .await
            .unwrap();
    }

    let provider = CartProvider::open(&config).await.unwrap();
    let item = provider.store().get("ç").await.unwrap();
    assert_eq!(item.title, "Camiseta 🚀 日本語");
}
