//! Core types for StreetStyle.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod size;

pub use id::*;
pub use price::{CurrencyCode, format_amount};
pub use size::{Size, SizeError};
