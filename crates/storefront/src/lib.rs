//! StreetStyle storefront library.
//!
//! The cart store and everything around it: persistence through a
//! key/value [`storage::Storage`] backend, the product [`catalog`], derived
//! totals, the messaging [`checkout`] hand-off and display [`view`] models.
//!
//! ```
//! use streetstyle_core::{ProductId, Size};
//! use streetstyle_storefront::cart::{CartSettings, CartStore};
//! use streetstyle_storefront::catalog::Catalog;
//! use streetstyle_storefront::storage::MemoryStorage;
//!
//! let catalog = Catalog::builtin();
//! let mut store = CartStore::open(MemoryStorage::new(), CartSettings::default());
//! store
//!     .add_from_catalog(&catalog, &ProductId::new("1"), Some(Size::parse("M").unwrap()), 2)
//!     .unwrap();
//! assert_eq!(store.item_count(), 2);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod view;

pub use error::{Result, StorefrontError};
pub use state::AppState;
