//! Checkout hand-off.

use std::io::Write;

use streetstyle_storefront::checkout;
use streetstyle_storefront::storage::Storage;
use streetstyle_storefront::{AppState, StorefrontError};

use super::Result;

/// Print the order message and the link that sends it.
///
/// With `dry_run` the cart is left as is; otherwise it is emptied once the
/// link is built.
///
/// # Errors
///
/// Returns an error if the cart is empty, no destination number is
/// configured, or output cannot be written.
pub fn run<S: Storage>(state: &mut AppState<S>, dry_run: bool, out: &mut impl Write) -> Result {
    let handoff = if dry_run {
        let store = state.cart();
        let settings = state.config().checkout_settings();
        checkout::prepare(store.cart(), &store.totals(), &settings).map_err(StorefrontError::from)?
    } else {
        state.checkout()?
    };

    writeln!(out, "{}", handoff.message)?;
    writeln!(out)?;
    writeln!(out, "Abra o link para enviar o pedido:")?;
    writeln!(out, "{}", handoff.url)?;
    Ok(())
}
