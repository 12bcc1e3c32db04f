//! Read-only product catalog.
//!
//! The catalog is the source of the name, price and image copied into a
//! cart line. It ships with the store's built-in product list and can be
//! replaced by a JSON file (`STOREFRONT_CATALOG_PATH`) using the same
//! camelCase field names as the built-in data.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use streetstyle_core::{ProductId, Size};
use thiserror::Error;

use crate::cart::LineItem;

/// Number of products shown in the featured grid.
pub const FEATURED_COUNT: usize = 3;

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid catalog JSON.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an ID.
    #[error("Duplicate product ID in catalog: {0}")]
    DuplicateId(ProductId),
}

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    /// Previous price, shown struck through when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    /// Image references; the first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<Size>,
    /// Promotional label ("Promoção", "Novo", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Product {
    /// Primary image reference, or an empty string when there are none.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    /// Whether `size` is offered.
    #[must_use]
    pub fn has_size(&self, size: &Size) -> bool {
        self.sizes.contains(size)
    }

    /// Whether the product is discounted from a higher previous price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.old_price.is_some_and(|old| old > self.price)
    }

    /// Snapshot this product into a cart line with quantity 1.
    #[must_use]
    pub fn to_line_item(&self, size: Option<Size>) -> LineItem {
        let item = LineItem::new(
            self.id.clone(),
            self.name.clone(),
            self.price,
            self.primary_image(),
        );
        match size {
            Some(size) => item.with_size(size),
            None => item,
        }
    }
}

/// An ordered list of products.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (i, product) in products.iter().enumerate() {
            if products
                .iter()
                .skip(i + 1)
                .any(|other| other.id == product.id)
            {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is invalid or IDs repeat.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// The store's built-in product list.
    #[must_use]
    pub fn builtin() -> Self {
        let sizes = || {
            ["P", "M", "G", "GG"]
                .into_iter()
                .filter_map(|s| Size::parse(s).ok())
                .collect::<Vec<_>>()
        };
        let images = |n: u8| vec![format!("img/placeholder{n}.jpg"); 3];

        let product = |id: &str,
                       name: &str,
                       cents: i64,
                       old_cents: Option<i64>,
                       description: &str,
                       image: u8,
                       badge: Option<&str>| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            old_price: old_cents.map(|c| Decimal::new(c, 2)),
            description: description.to_string(),
            images: images(image),
            sizes: sizes(),
            badge: badge.map(str::to_string),
        };

        Self {
            products: vec![
                product(
                    "1",
                    "Camiseta Isolated",
                    8990,
                    Some(10990),
                    "Camiseta de alta qualidade com estampa gráfica inspirada na arte de rua. Perfeita para um look despojado e autêntico.",
                    2,
                    Some("Promoção"),
                ),
                product(
                    "2",
                    "Camiseta Beuty",
                    9990,
                    None,
                    "Design futurista e tecido confortável para quem vive a pulsação da cidade. Edição limitada!",
                    3,
                    None,
                ),
                product(
                    "3",
                    "Camiseta Discover",
                    7990,
                    None,
                    "Estampa vibrante inspirada nos murais urbanos, trazendo a arte da rua para o seu guarda-roupa.",
                    4,
                    Some("Novo"),
                ),
                product(
                    "4",
                    "Camiseta Society",
                    6990,
                    None,
                    "Minimalista e elegante, perfeita para combinar com qualquer peça do seu guarda-roupa streetwear.",
                    5,
                    None,
                ),
                product(
                    "5",
                    "Camiseta OutDated",
                    8500,
                    Some(9500),
                    "Um clássico repaginado com a atitude do streetwear. Conforto e estilo em uma só peça.",
                    6,
                    Some("Destaque"),
                ),
                product(
                    "6",
                    "Camiseta Just Vibin",
                    11000,
                    None,
                    "Para os aventureiros urbanos, com estampa que remete à exploração da cidade e suas nuances.",
                    7,
                    None,
                ),
            ],
        }
    }

    /// All products in listing order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// The first [`FEATURED_COUNT`] products.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        let end = self.products.len().min(FEATURED_COUNT);
        self.products.get(..end).unwrap_or_default()
    }

    /// Product with the given ID.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
