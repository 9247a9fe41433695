// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # GoMarketplace Core
//!
//! Core types and traits for the GoMarketplace cart.
//!
//! This crate provides the foundational abstractions used by the store
//! crate, including:
//!
//! - Domain models (cart items, the cart itself)
//! - Error types
//! - The key-value storage trait the cart persists through
//!
//! ## Key Types
//!
//! - [`Cart`] - Ordered, id-keyed list of cart lines
//! - [`CartItem`] - A product plus a quantity
//! - [`NewCartItem`] - A product descriptor passed to `add_to_cart`
//! - [`KeyValueStorage`] - Local device storage seam

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{Cart, CartItem, NewCartItem};

// Re-export traits
pub use traits::KeyValueStorage;
