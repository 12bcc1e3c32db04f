//! Key/value storage backends for persisted cart state.
//!
//! # Architecture
//!
//! The cart is persisted as a single serialized value under a fixed key,
//! the same shape browser `localStorage` offers. [`Storage`] is the seam:
//!
//! - [`MemoryStorage`] - in-process map with an optional byte quota, used in
//!   tests and for ephemeral sessions
//! - [`FileStorage`] - one JSON file per key inside a data directory, used by
//!   the CLI so the cart survives between invocations
//!
//! Backends only move strings around; encoding and the fail-safe policy
//! (decode errors become an empty cart, write errors are logged) live in
//! [`crate::cart::CartStore`].

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when reading from or writing to a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the value would exceed the backend's capacity.
    #[error("Quota exceeded writing key '{key}': need {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key/value store.
///
/// Mirrors the subset of the Web Storage API the cart needs.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails or exceeds the quota.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
