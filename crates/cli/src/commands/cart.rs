//! Cart manipulation.
//!
//! Every command prints the re-rendered cart afterwards, so the output
//! always reflects the persisted state.

use std::io::Write;

use streetstyle_core::{ProductId, Size};
use streetstyle_storefront::AppState;
use streetstyle_storefront::cart::LineKey;
use streetstyle_storefront::storage::Storage;

use super::Result;

/// Print the cart, as text or as JSON.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn show<S: Storage>(state: &AppState<S>, json: bool, out: &mut impl Write) -> Result {
    if json {
        let store = state.cart();
        let value = serde_json::json!({
            "items": store.cart(),
            "totals": store.totals(),
            "itemCount": store.item_count(),
        });
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", state.cart_view())?;
    }
    Ok(())
}

/// Add a catalog product.
///
/// # Errors
///
/// Returns an error if the product is unknown, the size is missing or not
/// offered, the quantity is zero, or output cannot be written.
pub fn add<S: Storage>(
    state: &mut AppState<S>,
    id: &ProductId,
    size: Option<Size>,
    quantity: u32,
    out: &mut impl Write,
) -> Result {
    state.add_to_cart(id, size, quantity)?;
    show(state, false, out)
}

/// Add `delta` units to a line.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn change<S: Storage>(
    state: &mut AppState<S>,
    key: &LineKey,
    delta: i64,
    out: &mut impl Write,
) -> Result {
    state.cart_mut().change_quantity(key, delta);
    show(state, false, out)
}

/// Set a line's quantity; zero or below removes it.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn set<S: Storage>(
    state: &mut AppState<S>,
    key: &LineKey,
    quantity: i64,
    out: &mut impl Write,
) -> Result {
    state.cart_mut().set_quantity(key, quantity);
    show(state, false, out)
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn remove<S: Storage>(state: &mut AppState<S>, key: &LineKey, out: &mut impl Write) -> Result {
    state.cart_mut().remove_item(key);
    show(state, false, out)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn clear<S: Storage>(state: &mut AppState<S>, out: &mut impl Write) -> Result {
    state.cart_mut().clear();
    show(state, false, out)
}
