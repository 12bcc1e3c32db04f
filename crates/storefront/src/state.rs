//! Session state tying configuration, catalog and cart store together.

use streetstyle_core::{CurrencyCode, ProductId, Size};

use crate::cart::{Cart, CartError, CartStore};
use crate::catalog::{Catalog, Product};
use crate::checkout::{CheckoutHandoff, CheckoutSettings};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::storage::{FileStorage, Storage};
use crate::view::{CartView, ProductCardView, ProductDetailView};

/// Everything one storefront session needs.
///
/// Owns the cart store, so there is exactly one authoritative cart per
/// session. Presentation code renders views from here after each change.
#[derive(Debug)]
pub struct AppState<S = FileStorage> {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout: CheckoutSettings,
    cart: CartStore<S>,
}

impl AppState<FileStorage> {
    /// Create state backed by files in the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self> {
        let storage = config.storage();
        Self::with_storage(config, storage)
    }
}

impl<S: Storage> AppState<S> {
    /// Create state over an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog cannot be loaded.
    pub fn with_storage(config: StorefrontConfig, storage: S) -> Result<Self> {
        let catalog = config.catalog()?;
        let checkout = config.checkout_settings();
        let cart = CartStore::open(storage, config.cart_settings());

        Ok(Self {
            config,
            catalog,
            checkout,
            cart,
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// Get a mutable reference to the cart store.
    pub const fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// Look up a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownProduct` if the ID is not in the catalog.
    pub fn product(&self, id: &ProductId) -> Result<&Product> {
        Ok(self
            .catalog
            .find(id)
            .ok_or_else(|| CartError::UnknownProduct(id.clone()))?)
    }

    /// Add `quantity` units of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown, the size is missing or
    /// not offered, or the quantity is zero.
    pub fn add_to_cart(
        &mut self,
        id: &ProductId,
        size: Option<Size>,
        quantity: u32,
    ) -> Result<&Cart> {
        Ok(self
            .cart
            .add_from_catalog(&self.catalog, id, size, quantity)?)
    }

    /// Hand the cart off to the messaging app and empty it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or no destination is configured.
    pub fn checkout(&mut self) -> Result<CheckoutHandoff> {
        Ok(self.cart.checkout(&self.checkout)?)
    }

    /// Render the cart.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::render(self.cart.cart(), &self.cart.totals(), self.currency())
    }

    /// Render every catalog product as a listing card.
    #[must_use]
    pub fn product_cards(&self) -> Vec<ProductCardView> {
        self.render_cards(self.catalog.all())
    }

    /// Render the featured products as listing cards.
    #[must_use]
    pub fn featured_cards(&self) -> Vec<ProductCardView> {
        self.render_cards(self.catalog.featured())
    }

    /// Render a product detail page.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownProduct` if the ID is not in the catalog.
    pub fn product_detail(&self, id: &ProductId) -> Result<ProductDetailView> {
        let product = self.product(id)?;
        Ok(ProductDetailView::render(
            product,
            &self.config.store_name,
            self.currency(),
        ))
    }

    fn render_cards(&self, products: &[Product]) -> Vec<ProductCardView> {
        products
            .iter()
            .map(|product| ProductCardView::render(product, self.currency()))
            .collect()
    }

    const fn currency(&self) -> CurrencyCode {
        self.checkout.currency
    }
}
