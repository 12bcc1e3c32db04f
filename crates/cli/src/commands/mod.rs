//! Subcommand implementations.
//!
//! Each command writes its output to the given writer so it can be checked
//! in tests without a terminal.

pub mod cart;
pub mod checkout;
pub mod products;

use std::io;

use streetstyle_storefront::StorefrontError;
use thiserror::Error;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Whether the error should be reported to error tracking.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Storefront(e) => e.is_internal(),
            Self::Io(_) | Self::Json(_) => true,
        }
    }
}

/// Result type for commands.
pub type Result<T = ()> = std::result::Result<T, CliError>;
