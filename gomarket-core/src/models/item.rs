//! Cart line item types.
//!
//! - [`CartItem`] - A product reference plus a quantity
//! - [`NewCartItem`] - The product descriptor handed to `add_to_cart`

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// Checks that a price can be written to the persisted blob and read back.
///
/// JSON has no representation for NaN or infinity, so those are the only
/// prices rejected.
fn validate_price(id: &str, price: f64) -> Result<(), CoreError> {
    if price.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidData(format!(
            "price for {id:?} must be a finite number, got {price}"
        )))
    }
}

/// Reads a quantity stored either as an integer or as a whole float (`2.0`).
#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawQuantity {
        Int(u32),
        Float(f64),
    }

    match RawQuantity::deserialize(deserializer)? {
        RawQuantity::Int(n) => Ok(n),
        RawQuantity::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
            Ok(f as u32)
        }
        RawQuantity::Float(f) => Err(serde::de::Error::custom(format!(
            "quantity must be a non-negative whole number, got {f}"
        ))),
    }
}

// ============================================================================
// New Cart Item
// ============================================================================

/// A product descriptor without a quantity.
///
/// This is what UI components pass when the user taps "add to cart".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Product identifier, unique within a cart.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image URL.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl NewCartItem {
    /// Creates a new product descriptor.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Validates the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is NaN or infinite.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_price(&self.id, self.price)
    }

    /// Turns the descriptor into a line item holding a single unit.
    pub fn into_item(self) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

// ============================================================================
// Cart Item
// ============================================================================

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique within a cart.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image URL.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Number of units in the cart.
    #[serde(deserialize_with = "deserialize_quantity")]
    pub quantity: u32,
}

impl CartItem {
    /// Returns `price * quantity`.
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Validates the item's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is NaN or infinite.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_price(&self.id, self.price)
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        item.into_item()
    }
}

// ============================================================================
// Tests
// ============================================================================
