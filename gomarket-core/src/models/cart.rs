//! The ordered cart.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::item::{CartItem, NewCartItem};
use crate::error::CoreError;

/// An ordered sequence of cart items keyed by id.
///
/// Insertion order is preserved and ids are unique. Every item present has
/// a quantity of at least one; an item whose quantity drops to zero is
/// removed.
///
/// Serializes as a bare JSON array of [`CartItem`] so the persisted blob is
/// just the product list. Deserializing goes through [`Cart::from_items`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from arbitrary items, restoring the cart invariants.
    ///
    /// Items with a zero quantity are dropped, as are items whose price
    /// fails [`CartItem::validate`], the same rule `add_to_cart` applies.
    /// A repeated id is folded into its first occurrence by summing
    /// quantities.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                debug!(id = %item.id, "Dropping zero-quantity item");
                continue;
            }
            if let Err(e) = item.validate() {
                warn!(id = %item.id, error = %e, "Dropping unpersistable item");
                continue;
            }
            match cart.position(&item.id) {
                Some(index) => {
                    debug!(id = %item.id, "Merging duplicate item");
                    let existing = &mut cart.items[index];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Decodes a persisted blob into a normalized cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not a JSON array of cart items.
    pub fn from_json(blob: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(blob)?)
    }

    /// Encodes the cart as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds one unit of a product.
    ///
    /// An existing line is bumped in place; otherwise a new line with
    /// quantity one is appended. Returns the line's new quantity.
    pub fn add(&mut self, item: NewCartItem) -> u32 {
        if let Some(index) = self.position(&item.id) {
            let existing = &mut self.items[index];
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }
        self.items.push(item.into_item());
        1
    }

    /// Adds one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotFound`] if no line has this id.
    pub fn increment(&mut self, id: &str) -> Result<u32, CoreError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        item.quantity = item.quantity.saturating_add(1);
        Ok(item.quantity)
    }

    /// Removes one unit from an existing line, dropping the line at zero.
    ///
    /// Returns the line's remaining quantity (zero when it was removed).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotFound`] if no line has this id.
    pub fn decrement(&mut self, id: &str) -> Result<u32, CoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;

        let item = &mut self.items[index];
        item.quantity = item.quantity.saturating_sub(1);
        let remaining = item.quantity;
        if remaining == 0 {
            self.items.remove(index);
        }
        Ok(remaining)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterates over the items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Returns the line with this id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns true if a line with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Consumes the cart, returning its items.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> NewCartItem {
        NewCartItem::new("a", "Shirt", "https://img/a.png", 10.0)
    }

    fn mug() -> NewCartItem {
        NewCartItem::new("b", "Mug", "https://img/b.png", 4.5)
    }

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_add_appends_new_item() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(shirt()), 1);
        assert_eq!(cart.add(mug()), 1);

        assert_eq!(ids(&cart), vec!["a", "b"]);
        assert_eq!(cart.get("b").unwrap().quantity, 1);
    }

    #[test]
    fn test_add_existing_bumps_in_place() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(mug());
        assert_eq!(cart.add(shirt()), 2);

        assert_eq!(cart.len(), 2);
        assert_eq!(ids(&cart), vec!["a", "b"]);
        assert_eq!(cart.get("a").unwrap().quantity, 2);
    }

    #[test]
    fn test_increment_only_touches_target() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(mug());

        assert_eq!(cart.increment("b").unwrap(), 2);
        assert_eq!(cart.get("a").unwrap().quantity, 1);
        assert_eq!(cart.get("b").unwrap().quantity, 2);
    }

    #[test]
    fn test_increment_unknown_id() {
        let mut cart = Cart::new();
        cart.add(shirt());

        let err = cart.increment("missing").unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound(ref id) if id == "missing"));
        assert_eq!(cart.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_decrement_keeps_item_above_one() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(shirt());

        assert_eq!(cart.decrement("a").unwrap(), 1);
        assert!(cart.contains("a"));
    }

    #[test]
    fn test_decrement_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(mug());

        assert_eq!(cart.decrement("a").unwrap(), 0);
        assert!(!cart.contains("a"));
        assert_eq!(ids(&cart), vec!["b"]);
    }

    #[test]
    fn test_decrement_unknown_id() {
        let mut cart = Cart::new();
        cart.add(shirt());

        assert!(cart.decrement("missing").is_err());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_from_items_normalizes() {
        let mut a = shirt().into_item();
        a.quantity = 2;
        let mut zero = mug().into_item();
        zero.quantity = 0;
        let mut a_again = shirt().into_item();
        a_again.quantity = 3;
        let c = NewCartItem::new("c", "Hat", "", 7.0).into_item();

        let cart = Cart::from_items(vec![a, zero, a_again, c]);

        assert_eq!(ids(&cart), vec!["a", "c"]);
        assert_eq!(cart.get("a").unwrap().quantity, 5);
    }

    #[test]
    fn test_from_items_applies_add_rule() {
        let mut odd = NewCartItem::new("", "Gift", "", -5.0).into_item();
        odd.quantity = 2;
        let mut broken = mug().into_item();
        broken.price = f64::NAN;

        let cart = Cart::from_items(vec![odd, broken]);

        assert_eq!(ids(&cart), vec![""]);
        assert_eq!(cart.get("").unwrap().quantity, 2);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        assert_eq!(cart.total_quantity(), 0);
        assert!(cart.total_price().abs() < f64::EPSILON);

        cart.add(shirt());
        cart.add(shirt());
        cart.add(mug());

        assert_eq!(cart.total_quantity(), 3);
        assert!((cart.total_price() - 24.5).abs() < 1e-9);
    }
}
