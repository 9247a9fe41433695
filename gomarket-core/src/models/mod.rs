//! Domain models for the cart.
//!
//! ## Submodules
//!
//! - [`item`] - Line item types (CartItem, NewCartItem)
//! - [`cart`] - The ordered, id-keyed cart

mod cart;
mod item;

pub use cart::Cart;
pub use item::{CartItem, NewCartItem};
