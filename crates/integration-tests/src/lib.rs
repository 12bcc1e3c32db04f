//! Integration tests for StreetStyle.
//!
//! Tests drive the cart store end to end over real files in a temporary
//! directory, the same way the CLI does.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p streetstyle-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Store operations surviving a reopen
//! - `checkout_flow` - Hand-off composition and cart clearing

use std::path::Path;

use streetstyle_storefront::cart::{CartSettings, CartStore};
use streetstyle_storefront::storage::FileStorage;
use tempfile::TempDir;

/// A temporary data directory with helpers to open stores over it.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create a fresh, empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Path of the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// File storage over the data directory.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.dir.path())
    }

    /// Open a cart store with default settings, as a new page load would.
    #[must_use]
    pub fn open_store(&self) -> CartStore<FileStorage> {
        self.open_store_with(CartSettings::default())
    }

    /// Open a cart store with explicit settings.
    #[must_use]
    pub fn open_store_with(&self, settings: CartSettings) -> CartStore<FileStorage> {
        CartStore::open(self.storage(), settings)
    }

    /// Raw persisted value for `key`, if the file exists.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(format!("{key}.json"))).ok()
    }

    /// Overwrite the persisted value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[allow(clippy::expect_used)]
    pub fn write_raw(&self, key: &str, value: &str) {
        std::fs::write(self.dir.path().join(format!("{key}.json")), value).expect("write raw value");
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
