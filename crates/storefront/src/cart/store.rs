//! The persisting cart store.

use std::fmt;

use streetstyle_core::{ProductId, Size};
use thiserror::Error;
use tracing::instrument;

use super::{Cart, KeyPolicy, LineItem, LineKey, ShippingPolicy, Totals};
use crate::catalog::{Catalog, Product};
use crate::checkout::{self, CheckoutError, CheckoutHandoff, CheckoutSettings};
use crate::storage::Storage;

/// Storage key the cart lives under by default.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Errors from cart operations driven by catalog input.
///
/// Quantity changes and removals never fail; only adding a product can be
/// rejected, because the request itself is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No product with this ID in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The product comes in sizes and none was selected.
    #[error("Product {0} requires a size")]
    SizeRequired(ProductId),

    /// The selected size is not offered for the product.
    #[error("Product {product} is not available in size {size}")]
    UnavailableSize { product: ProductId, size: Size },

    /// Quantity must be at least 1.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// Policy knobs for a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    /// Storage key holding the serialized cart.
    pub storage_key: String,
    /// Which fields make a line unique.
    pub key_policy: KeyPolicy,
    /// Shipping fee rules.
    pub shipping: ShippingPolicy,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_KEY.to_string(),
            key_policy: KeyPolicy::default(),
            shipping: ShippingPolicy::default(),
        }
    }
}

type CountListener = Box<dyn Fn(u32)>;

/// Authoritative cart state for one session.
///
/// Build one per session with [`CartStore::open`] and hand it to the
/// presentation layer. Every mutation that changes the cart is persisted
/// immediately; persistence is best-effort and never fails the caller.
pub struct CartStore<S> {
    storage: S,
    settings: CartSettings,
    cart: Cart,
    listeners: Vec<CountListener>,
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("settings", &self.settings)
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: Storage> CartStore<S> {
    /// Open the store, loading any persisted cart from `storage`.
    pub fn open(storage: S, settings: CartSettings) -> Self {
        let mut store = Self {
            storage,
            settings,
            cart: Cart::new(),
            listeners: Vec::new(),
        };
        store.load();
        store
    }

    /// Re-read the cart from storage.
    ///
    /// Missing state yields an empty cart. Read or decode failures are
    /// logged and also yield an empty cart; they never reach the caller.
    #[instrument(skip(self), fields(key = %self.settings.storage_key))]
    pub fn load(&mut self) -> &Cart {
        self.cart = match self.storage.get_item(&self.settings.storage_key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<LineItem>>(&raw) {
                Ok(lines) => Cart::from_lines(self.settings.key_policy, lines),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to decode stored cart, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored cart, starting empty");
                Cart::new()
            }
        };
        tracing::debug!(lines = self.cart.len(), "Cart loaded");
        &self.cart
    }

    /// Write the current cart to storage and notify listeners.
    ///
    /// Failures are logged and swallowed; listeners only hear about writes
    /// that succeeded.
    #[instrument(skip(self), fields(key = %self.settings.storage_key))]
    pub fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.cart) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode cart");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.settings.storage_key, &encoded) {
            tracing::error!(error = %e, "Failed to persist cart");
            return;
        }

        let count = self.cart.item_count();
        tracing::debug!(item_count = count, "Cart persisted");
        for listener in &self.listeners {
            listener(count);
        }
    }

    /// Register an item-count listener, called after every successful write.
    pub fn subscribe(&mut self, listener: impl Fn(u32) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Store settings.
    #[must_use]
    pub const fn settings(&self) -> &CartSettings {
        &self.settings
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.cart, &self.settings.shipping)
    }

    /// Sum of quantities in the current cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Add `item.quantity` units of `item`, merging with an existing line.
    #[instrument(skip(self, item), fields(product = %item.id, quantity = item.quantity))]
    pub fn add_item(&mut self, item: LineItem) -> &Cart {
        let policy = self.settings.key_policy;
        if self.cart.add_item(policy, item) {
            self.persist();
        }
        &self.cart
    }

    /// Snapshot `product` into a line and add `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if `quantity` is zero, or if the size is missing
    /// or not offered for the product.
    pub fn add_product(
        &mut self,
        product: &Product,
        size: Option<Size>,
        quantity: u32,
    ) -> Result<&Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        match &size {
            Some(size) if !product.has_size(size) => {
                return Err(CartError::UnavailableSize {
                    product: product.id.clone(),
                    size: size.clone(),
                });
            }
            None if self.settings.key_policy.uses_size() && !product.sizes.is_empty() => {
                return Err(CartError::SizeRequired(product.id.clone()));
            }
            _ => {}
        }

        let item = product.to_line_item(size).with_quantity(quantity);
        Ok(self.add_item(item))
    }

    /// Look up `id` in `catalog` and add it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownProduct` if the catalog has no such
    /// product, otherwise as [`CartStore::add_product`].
    pub fn add_from_catalog(
        &mut self,
        catalog: &Catalog,
        id: &ProductId,
        size: Option<Size>,
        quantity: u32,
    ) -> Result<&Cart, CartError> {
        let product = catalog
            .find(id)
            .ok_or_else(|| CartError::UnknownProduct(id.clone()))?;
        self.add_product(product, size, quantity)
    }

    /// Add `delta` to a line's quantity, removing it at zero or below.
    #[instrument(skip(self, key), fields(key = %key))]
    pub fn change_quantity(&mut self, key: &LineKey, delta: i64) -> &Cart {
        let policy = self.settings.key_policy;
        if self.cart.change_quantity(policy, key, delta) {
            self.persist();
        }
        &self.cart
    }

    /// Set a line's quantity, removing it at zero or below.
    #[instrument(skip(self, key), fields(key = %key))]
    pub fn set_quantity(&mut self, key: &LineKey, new_quantity: i64) -> &Cart {
        let policy = self.settings.key_policy;
        if self.cart.set_quantity(policy, key, new_quantity) {
            self.persist();
        }
        &self.cart
    }

    /// Remove every line addressed by `key`.
    #[instrument(skip(self, key), fields(key = %key))]
    pub fn remove_item(&mut self, key: &LineKey) -> &Cart {
        let policy = self.settings.key_policy;
        if self.cart.remove_item(policy, key) {
            self.persist();
        }
        &self.cart
    }

    /// Empty the cart and persist the empty state.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> &Cart {
        self.cart.clear();
        self.persist();
        &self.cart
    }

    /// Compose the checkout hand-off and clear the cart.
    ///
    /// The cart is cleared as soon as the link is built; whether the
    /// customer actually sends the message is not observable.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the cart is empty or the destination is
    /// missing or invalid. The cart is left untouched in that case.
    #[instrument(skip(self, settings))]
    pub fn checkout(&mut self, settings: &CheckoutSettings) -> Result<CheckoutHandoff, CheckoutError> {
        let totals = self.totals();
        let handoff = checkout::prepare(&self.cart, &totals, settings)?;
        tracing::info!(
            lines = self.cart.len(),
            item_count = handoff.item_count,
            total = %handoff.totals.total,
            "Checkout hand-off prepared"
        );
        self.clear();
        Ok(handoff)
    }
}
