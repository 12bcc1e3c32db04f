//! Display models for the presentation layer.
//!
//! Render functions take the current state and return plain data with every
//! price already formatted. Callers re-render after each mutation instead of
//! patching a previous view.

use std::fmt;

use streetstyle_core::{CurrencyCode, format_amount};

use crate::cart::{Cart, LineItem, Totals};
use crate::catalog::Product;

// =============================================================================
// Cart
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub size: Option<String>,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl CartItemView {
    fn render(line: &LineItem, currency: CurrencyCode) -> Self {
        Self {
            id: line.id.to_string(),
            size: line.size.as_ref().map(ToString::to_string),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            price: format_amount(line.price, currency),
            line_price: format_amount(line.line_total(), currency),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
    pub checkout_enabled: bool,
}

impl CartView {
    /// Render `cart` with its `totals`.
    #[must_use]
    pub fn render(cart: &Cart, totals: &Totals, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView::render(line, currency))
                .collect(),
            subtotal: format_amount(totals.subtotal, currency),
            shipping: format_amount(totals.shipping, currency),
            total: format_amount(totals.total, currency),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
            checkout_enabled: !cart.is_empty(),
        }
    }

    /// Render an empty cart.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self::render(&Cart::new(), &Totals::zero(), currency)
    }
}

impl fmt::Display for CartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty {
            return writeln!(f, "Seu carrinho está vazio.");
        }

        for item in &self.items {
            write!(f, "[{}", item.id)?;
            if let Some(size) = &item.size {
                write!(f, "/{size}")?;
            }
            writeln!(
                f,
                "] {} x{} @ {} = {}",
                item.name, item.quantity, item.price, item.line_price
            )?;
        }
        writeln!(f, "Itens: {}", self.item_count)?;
        writeln!(f, "Subtotal: {}", self.subtotal)?;
        writeln!(f, "Frete: {}", self.shipping)?;
        writeln!(f, "Total: {}", self.total)
    }
}

// =============================================================================
// Products
// =============================================================================

/// Product card display data for listing grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: String,
    pub old_price: Option<String>,
    pub badge: Option<String>,
    pub href: String,
}

impl ProductCardView {
    /// Render a listing card.
    #[must_use]
    pub fn render(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.primary_image().to_string(),
            price: format_amount(product.price, currency),
            old_price: product.old_price.map(|p| format_amount(p, currency)),
            badge: product.badge.clone(),
            href: format!("produto.html?id={}", urlencoding::encode(product.id.as_str())),
        }
    }
}

impl fmt::Display for ProductCardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}  {}  ", self.id, self.name)?;
        if let Some(old) = &self.old_price {
            write!(f, "(de {old}) ")?;
        }
        write!(f, "{}", self.price)?;
        if let Some(badge) = &self.badge {
            write!(f, "  [{badge}]")?;
        }
        Ok(())
    }
}

/// Product detail page display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetailView {
    pub id: String,
    pub page_title: String,
    pub name: String,
    pub price: String,
    pub old_price: Option<String>,
    pub description: String,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub badge: Option<String>,
}

impl ProductDetailView {
    /// Render a detail page for `product` in `store_name`.
    #[must_use]
    pub fn render(product: &Product, store_name: &str, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            page_title: format!("{} - {store_name}", product.name),
            name: product.name.clone(),
            price: format_amount(product.price, currency),
            old_price: product.old_price.map(|p| format_amount(p, currency)),
            description: product.description.clone(),
            images: product.images.clone(),
            sizes: product.sizes.iter().map(ToString::to_string).collect(),
            badge: product.badge.clone(),
        }
    }
}

impl fmt::Display for ProductDetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.page_title)?;
        match &self.old_price {
            Some(old) => writeln!(f, "Preço: {} (de {old})", self.price)?,
            None => writeln!(f, "Preço: {}", self.price)?,
        }
        if !self.sizes.is_empty() {
            writeln!(f, "Tamanhos: {}", self.sizes.join(", "))?;
        }
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        Ok(())
    }
}
