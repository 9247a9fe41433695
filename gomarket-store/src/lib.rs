// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # GoMarketplace Store
//!
//! Cart state management for GoMarketplace.
//!
//! This crate provides:
//!
//! - **CartStore**: The in-memory cart, hydrated once and persisted after every mutation
//! - **CartProvider / CartContext**: Session scope handing the store to consumers
//! - **Storage**: Memory and file-backed key-value backends
//! - **Persistence**: File I/O helpers
//!
//! ## Usage
//!
//! ```ignore
//! use gomarket_store::{use_cart, CartConfig, CartProvider};
//! use gomarket_core::NewCartItem;
//!
//! let provider = CartProvider::open(&CartConfig::default()).await?;
//! let context = provider.context();
//!
//! let cart = use_cart(&context)?;
//! cart.add_to_cart(NewCartItem::new("a", "Shirt", "https://img/a.png", 10.0)).await?;
//!
//! let mut rx = cart.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("{} items", cart.products().await.len());
//! }
//! ```

pub mod cart_store;
pub mod config;
pub mod error;
pub mod persistence;
pub mod provider;
pub mod storage;

pub use cart_store::CartStore;
pub use config::{CartConfig, DEFAULT_STORAGE_KEY};
pub use error::StoreError;
pub use persistence::{
    default_config_path, default_data_dir, load_json, load_json_or_default, save_json,
};
pub use provider::{use_cart, CartContext, CartProvider};
pub use storage::{FileStorage, MemoryStorage};
#[cfg(test)]
mod persistence_tests;
