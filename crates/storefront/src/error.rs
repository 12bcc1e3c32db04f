//! Unified error type for storefront operations.
//!
//! Library modules keep their own error enums; `StorefrontError` wraps them
//! for callers that drive several modules at once, such as the CLI.

use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart request was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout could not be prepared.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl StorefrontError {
    /// Whether the error is a fault in the environment rather than a bad
    /// request. Only these are worth reporting to error tracking.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Catalog(_))
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use streetstyle_core::ProductId;

    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::from(CartError::UnknownProduct(ProductId::new("42")));
        assert_eq!(err.to_string(), "Unknown product: 42");

        let err = StorefrontError::from(ConfigError::MissingEnvVar("X".to_string()));
        assert_eq!(err.to_string(), "Configuration error: Missing environment variable: X");

        let err = StorefrontError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[test]
    fn test_is_internal() {
        assert!(StorefrontError::from(StorageError::InvalidKey("..".to_string())).is_internal());
        assert!(!StorefrontError::from(CheckoutError::MissingDestination).is_internal());
        assert!(!StorefrontError::from(CartError::InvalidQuantity).is_internal());
    }
}
