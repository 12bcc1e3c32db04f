//! Cart state: line items, uniqueness keys, totals and the persisting store.
//!
//! # Architecture
//!
//! - [`Cart`] holds the ordered line items and implements every quantity
//!   rule as a pure, in-memory operation
//! - [`KeyPolicy`] decides which fields make a line unique: the product id
//!   alone, or the product id plus the selected size
//! - [`Totals`] derives subtotal, shipping and total from a cart
//! - [`CartStore`] wraps a cart with a [`crate::storage::Storage`] backend,
//!   persisting after every change and notifying item-count listeners
//!
//! # Invariant
//!
//! A stored [`LineItem`] always has `quantity >= 1`. Any change that would
//! take a line to zero or below removes it instead.

#[cfg(test)]
mod proptests;
mod store;
mod totals;

pub use store::{CartError, CartSettings, CartStore, DEFAULT_CART_KEY};
pub use totals::{ShippingPolicy, Totals};

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use streetstyle_core::{ProductId, Size};

// =============================================================================
// Line Items
// =============================================================================

/// One cart entry: a product snapshot, an optional size and a quantity.
///
/// `name`, `price` and `image` are copied from the catalog when the line is
/// added and are never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product ID.
    pub id: ProductId,
    /// Product name at time of adding.
    pub name: String,
    /// Unit price at time of adding.
    pub price: Decimal,
    /// Image reference at time of adding.
    #[serde(default)]
    pub image: String,
    /// Selected size, if the product has sizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Number of units, always at least 1 once stored.
    #[serde(deserialize_with = "non_negative_quantity")]
    pub quantity: u32,
}

/// Decode a stored quantity, reading negatives as zero so the line can be
/// dropped instead of failing the whole cart.
fn non_negative_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}

impl LineItem {
    /// Create a line with quantity 1.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
            size: None,
            quantity: 1,
        }
    }

    /// Set the selected size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Lookup key passed to quantity and removal operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub id: ProductId,
    pub size: Option<Size>,
}

impl LineKey {
    /// Key for a product without a size.
    #[must_use]
    pub fn product(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            size: None,
        }
    }

    /// Key for a product in a specific size.
    #[must_use]
    pub fn sized(id: impl Into<ProductId>, size: Size) -> Self {
        Self {
            id: id.into(),
            size: Some(size),
        }
    }
}

impl From<&LineItem> for LineKey {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            size: item.size.clone(),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.size {
            Some(size) => write!(f, "{}/{size}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

// =============================================================================
// Key Policy
// =============================================================================

/// Which fields make a line item unique within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// One line per product; size is carried but ignored for matching.
    ProductId,
    /// One line per product and size.
    #[default]
    ProductAndSize,
}

impl KeyPolicy {
    /// Whether `item` is addressed by `key` under this policy.
    #[must_use]
    pub fn matches(self, item: &LineItem, key: &LineKey) -> bool {
        match self {
            Self::ProductId => item.id == key.id,
            Self::ProductAndSize => item.id == key.id && item.size == key.size,
        }
    }

    /// Whether this policy requires a size to tell lines apart.
    #[must_use]
    pub const fn uses_size(self) -> bool {
        matches!(self, Self::ProductAndSize)
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductId => write!(f, "product_id"),
            Self::ProductAndSize => write!(f, "product_and_size"),
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product_id" | "id" => Ok(Self::ProductId),
            "product_and_size" | "id+size" => Ok(Self::ProductAndSize),
            _ => Err(format!("invalid cart key policy: {s}")),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered collection of line items.
///
/// Serializes as a bare JSON array so the persisted value is just the list
/// of lines. Mutating methods return `true` when the cart changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from stored lines.
    ///
    /// Lines with zero quantity are dropped and lines sharing a key under
    /// `policy` are merged into the first one, as [`Cart::add_item`] would.
    #[must_use]
    pub fn from_lines(policy: KeyPolicy, lines: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_item(policy, line);
        }
        cart
    }

    /// Line items in display order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// First line addressed by `key`.
    #[must_use]
    pub fn get(&self, policy: KeyPolicy, key: &LineKey) -> Option<&LineItem> {
        self.lines.iter().find(|line| policy.matches(line, key))
    }

    /// Add `item.quantity` units of `item`.
    ///
    /// Increments the existing line with the same key, or appends `item` as
    /// a new line. Adding zero units does nothing.
    pub fn add_item(&mut self, policy: KeyPolicy, item: LineItem) -> bool {
        if item.quantity == 0 {
            return false;
        }

        let key = LineKey::from(&item);
        match self.lines.iter_mut().find(|line| policy.matches(line, &key)) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.lines.push(item),
        }
        true
    }

    /// Add `delta` to the quantity of the line addressed by `key`.
    ///
    /// A result of zero or below removes the line. Unknown keys are ignored.
    pub fn change_quantity(&mut self, policy: KeyPolicy, key: &LineKey, delta: i64) -> bool {
        let Some(current) = self.get(policy, key).map(|line| line.quantity) else {
            return false;
        };
        self.set_quantity(policy, key, i64::from(current).saturating_add(delta))
    }

    /// Set the quantity of the line addressed by `key`.
    ///
    /// A value of zero or below removes the line. Unknown keys are ignored.
    pub fn set_quantity(&mut self, policy: KeyPolicy, key: &LineKey, new_quantity: i64) -> bool {
        if new_quantity <= 0 {
            return self.remove_item(policy, key);
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|line| policy.matches(line, key)) {
            Some(line) if line.quantity == quantity => false,
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line addressed by `key`.
    pub fn remove_item(&mut self, policy: KeyPolicy, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !policy.matches(line, key));
        self.lines.len() != before
    }

    /// Remove all lines.
    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(LineItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shirt(id: &str, cents: i64) -> LineItem {
        LineItem::new(id, format!("Camiseta {id}"), Decimal::new(cents, 2), "img/a.jpg")
    }

    fn size(s: &str) -> Size {
        Size::parse(s).unwrap()
    }

    #[test]
    fn test_add_same_key_accumulates() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductId, shirt("1", 8990));
        cart.add_item(KeyPolicy::ProductId, shirt("1", 8990).with_quantity(2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines().first().unwrap().quantity, 3);
        assert_eq!(cart.subtotal(), Decimal::new(26970, 2));
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(KeyPolicy::ProductId, shirt("1", 100).with_quantity(0)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_sizes_split_lines_under_product_and_size() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductAndSize, shirt("1", 8990).with_size(size("M")));
        cart.add_item(KeyPolicy::ProductAndSize, shirt("1", 8990).with_size(size("G")));
        cart.add_item(KeyPolicy::ProductAndSize, shirt("1", 8990).with_size(size("M")));

        assert_eq!(cart.len(), 2);
        assert_eq!(
            cart.get(KeyPolicy::ProductAndSize, &LineKey::sized("1", size("M")))
                .unwrap()
                .quantity,
            2
        );
    }

    #[test]
    fn test_sizes_merge_under_product_id() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductId, shirt("1", 8990).with_size(size("M")));
        cart.add_item(KeyPolicy::ProductId, shirt("1", 8990).with_size(size("G")));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
        // First size selected wins
        assert_eq!(cart.lines().first().unwrap().size, Some(size("M")));
    }

    #[test]
    fn test_change_quantity_increments_and_decrements() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductId, shirt("2", 9990));
        let key = LineKey::product("2");

        assert!(cart.change_quantity(KeyPolicy::ProductId, &key, 4));
        assert_eq!(cart.item_count(), 5);
        assert!(cart.change_quantity(KeyPolicy::ProductId, &key, -2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_change_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductId, shirt("2", 9990));
        cart.add_item(KeyPolicy::ProductId, shirt("3", 7990));

        assert!(cart.change_quantity(KeyPolicy::ProductId, &LineKey::product("2"), -1));
        assert_eq!(cart.len(), 1);
        assert!(cart.get(KeyPolicy::ProductId, &LineKey::product("2")).is_none());
    }

    #[test]
    fn test_change_quantity_below_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductId, shirt("2", 9990).with_quantity(2));
        cart.change_quantity(KeyPolicy::ProductId, &LineKey::product("2"), -10);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_unknown_key_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductId, shirt("2", 9990));
        let before = cart.clone();

        assert!(!cart.change_quantity(KeyPolicy::ProductId, &LineKey::product("9"), 1));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_absolute() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductId, shirt("4", 6990));
        let key = LineKey::product("4");

        assert!(cart.set_quantity(KeyPolicy::ProductId, &key, 7));
        assert_eq!(cart.item_count(), 7);
        assert!(!cart.set_quantity(KeyPolicy::ProductId, &key, 7));
        assert!(cart.set_quantity(KeyPolicy::ProductId, &key, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_key_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.set_quantity(KeyPolicy::ProductId, &LineKey::product("4"), 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductAndSize, shirt("5", 8500).with_size(size("P")));
        let before = cart.clone();

        assert!(!cart.remove_item(KeyPolicy::ProductAndSize, &LineKey::sized("5", size("GG"))));
        assert_eq!(cart, before);
        assert!(cart.remove_item(KeyPolicy::ProductAndSize, &LineKey::sized("5", size("P"))));
        assert!(!cart.remove_item(KeyPolicy::ProductAndSize, &LineKey::sized("5", size("P"))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_by_product_id_drops_every_size() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductAndSize, shirt("6", 11000).with_size(size("P")));
        cart.add_item(KeyPolicy::ProductAndSize, shirt("6", 11000).with_size(size("G")));

        assert!(cart.remove_item(KeyPolicy::ProductId, &LineKey::product("6")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_drops_zero_quantity() {
        let cart = Cart::from_lines(
            KeyPolicy::ProductAndSize,
            vec![shirt("1", 100).with_quantity(0), shirt("2", 100)],
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines().first().unwrap().id.as_str(), "2");
    }

    #[test]
    fn test_from_lines_merges_duplicate_keys() {
        let lines = vec![
            shirt("1", 8990).with_size(size("M")),
            shirt("2", 9990),
            shirt("1", 8990).with_size(size("G")).with_quantity(2),
        ];

        let cart = Cart::from_lines(KeyPolicy::ProductId, lines.clone());
        assert_eq!(cart.len(), 2);
        let first = cart.lines().first().unwrap();
        assert_eq!(first.size, Some(size("M")));
        assert_eq!(first.quantity, 3);

        let cart = Cart::from_lines(KeyPolicy::ProductAndSize, lines);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_negative_stored_quantity_decodes_as_zero() {
        let line: LineItem = serde_json::from_str(
            r#"{"id":"1","name":"A","price":"10","quantity":-3}"#,
        )
        .unwrap();
        assert_eq!(line.quantity, 0);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add_item(KeyPolicy::ProductAndSize, shirt("1", 8990).with_size(size("M")));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": "1",
                "name": "Camiseta 1",
                "price": "89.90",
                "image": "img/a.jpg",
                "size": "M",
                "quantity": 1
            }])
        );
    }

    #[test]
    fn test_key_policy_parse_and_display() {
        assert_eq!("product_id".parse::<KeyPolicy>().unwrap(), KeyPolicy::ProductId);
        assert_eq!("id+size".parse::<KeyPolicy>().unwrap(), KeyPolicy::ProductAndSize);
        assert!("sku".parse::<KeyPolicy>().is_err());
        assert_eq!(KeyPolicy::ProductAndSize.to_string(), "product_and_size");
    }

    #[test]
    fn test_line_key_display() {
        assert_eq!(LineKey::product("1").to_string(), "1");
        assert_eq!(LineKey::sized("1", size("gg")).to_string(), "1/GG");
    }
}
