//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_DATA_DIR` - Directory holding persisted state
//!   (default: `<local data dir>/streetstyle`)
//! - `STOREFRONT_CART_KEY` - Storage key for the cart (default: `cart`)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog replacing the built-in products
//! - `STOREFRONT_NAME` - Store name used in messages and titles (default: `StreetStyle`)
//! - `CART_KEY_POLICY` - `product_and_size` or `product_id` (default: `product_and_size`)
//! - `SHIPPING_THRESHOLD` - Subtotal from which shipping is free (default: 300)
//! - `SHIPPING_FLAT_FEE` - Fee charged below the threshold (default: 20)
//! - `CHECKOUT_BASE_URL` - Messaging link base (default: `https://wa.me`)
//! - `CHECKOUT_PHONE_NUMBER` - Destination number, international format
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use streetstyle_core::CurrencyCode;
use thiserror::Error;
use url::Url;

use crate::cart::{CartSettings, KeyPolicy, ShippingPolicy};
use crate::catalog::{Catalog, CatalogError};
use crate::checkout::{self, CheckoutSettings};
use crate::storage::FileStorage;

const APP_DIR_NAME: &str = "streetstyle";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory for persisted state
    pub data_dir: PathBuf,
    /// Storage key for the cart
    pub cart_key: String,
    /// Optional catalog file
    pub catalog_path: Option<PathBuf>,
    /// Store name
    pub store_name: String,
    /// Which line fields make a cart line unique
    pub key_policy: KeyPolicy,
    /// Shipping fee rules
    pub shipping: ShippingPolicy,
    /// Messaging link base
    pub checkout_base_url: Url,
    /// Destination number for checkout, digits only
    pub checkout_phone_number: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let data_dir = match env.optional("STOREFRONT_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| ConfigError::MissingEnvVar("STOREFRONT_DATA_DIR".to_string()))?,
        };

        let shipping = ShippingPolicy::new(
            env.parsed::<Decimal>("SHIPPING_THRESHOLD", ShippingPolicy::DEFAULT_THRESHOLD)?,
            env.parsed::<Decimal>("SHIPPING_FLAT_FEE", ShippingPolicy::DEFAULT_FLAT_FEE)?,
        );
        if shipping.threshold.is_sign_negative() || shipping.flat_fee.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "SHIPPING_THRESHOLD/SHIPPING_FLAT_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let checkout_phone_number = env
            .optional("CHECKOUT_PHONE_NUMBER")
            .map(|phone| {
                checkout::normalize_phone(&phone).map_err(|e| {
                    ConfigError::InvalidEnvVar("CHECKOUT_PHONE_NUMBER".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            data_dir,
            cart_key: env.or_default("STOREFRONT_CART_KEY", crate::cart::DEFAULT_CART_KEY),
            catalog_path: env.optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            store_name: env.or_default("STOREFRONT_NAME", checkout::DEFAULT_STORE_NAME),
            key_policy: env.parsed("CART_KEY_POLICY", KeyPolicy::default())?,
            shipping,
            checkout_base_url: env.parsed(
                "CHECKOUT_BASE_URL",
                Url::parse(checkout::DEFAULT_BASE_URL).map_err(|e| {
                    ConfigError::InvalidEnvVar("CHECKOUT_BASE_URL".to_string(), e.to_string())
                })?,
            )?,
            checkout_phone_number,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Cart store settings.
    #[must_use]
    pub fn cart_settings(&self) -> CartSettings {
        CartSettings {
            storage_key: self.cart_key.clone(),
            key_policy: self.key_policy,
            shipping: self.shipping,
        }
    }

    /// Checkout settings.
    #[must_use]
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            base_url: self.checkout_base_url.clone(),
            phone_number: self.checkout_phone_number.clone(),
            store_name: self.store_name.clone(),
            currency: CurrencyCode::default(),
        }
    }

    /// File storage rooted at the data directory.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }

    /// The configured catalog, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a catalog file is configured but cannot be
    /// loaded.
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        self.catalog_path
            .as_deref()
            .map_or_else(|| Ok(Catalog::builtin()), Catalog::from_json_file)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
