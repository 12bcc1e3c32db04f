//! Catalog browsing.

use std::io::Write;

use streetstyle_core::ProductId;
use streetstyle_storefront::AppState;
use streetstyle_storefront::storage::Storage;

use super::Result;

/// Print every product.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn list<S: Storage>(state: &AppState<S>, out: &mut impl Write) -> Result {
    for card in state.product_cards() {
        writeln!(out, "{card}")?;
    }
    Ok(())
}

/// Print the featured products.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn featured<S: Storage>(state: &AppState<S>, out: &mut impl Write) -> Result {
    for card in state.featured_cards() {
        writeln!(out, "{card}")?;
    }
    Ok(())
}

/// Print one product's detail page.
///
/// # Errors
///
/// Returns an error if the product is unknown or output cannot be written.
pub fn show<S: Storage>(state: &AppState<S>, id: &ProductId, out: &mut impl Write) -> Result {
    let detail = state.product_detail(id)?;
    write!(out, "{detail}")?;
    Ok(())
}
