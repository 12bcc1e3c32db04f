//! StreetStyle Core - Shared types library.
//!
//! This crate provides common types used across all StreetStyle components:
//! - `storefront` - Cart store, catalog, checkout hand-off and views
//! - `cli` - Command-line front end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, size tags and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
