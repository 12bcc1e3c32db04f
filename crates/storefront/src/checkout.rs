//! Checkout hand-off to a messaging app.
//!
//! Checkout does not process payment. It writes an order summary as plain
//! text and builds a deep link of the form
//! `https://wa.me/<number>?text=<percent-encoded message>`; the customer
//! finishes the purchase in the conversation. There is no response channel,
//! so the hand-off is fire-and-forget.

use std::fmt::Write as _;

use streetstyle_core::{CurrencyCode, format_amount};
use thiserror::Error;
use url::Url;

use crate::cart::{Cart, Totals};

/// Default messaging link base.
pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// Default store name used in the greeting line.
pub const DEFAULT_STORE_NAME: &str = "StreetStyle";

/// Errors that can occur when preparing a checkout hand-off.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// No destination number is configured.
    #[error("No checkout phone number configured")]
    MissingDestination,

    /// The destination number is not usable in a link.
    #[error("Invalid checkout phone number: {0}")]
    InvalidDestination(String),

    /// The base URL cannot carry a path.
    #[error("Invalid checkout base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Where and how the order summary is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Messaging link base, e.g. `https://wa.me`.
    pub base_url: Url,
    /// Destination number in international format, digits only.
    pub phone_number: Option<String>,
    /// Store name used in the greeting line.
    pub store_name: String,
    /// Currency used to format amounts.
    pub currency: CurrencyCode,
}

impl CheckoutSettings {
    /// Set the destination number.
    #[must_use]
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }
}

impl Default for CheckoutSettings {
    #[allow(clippy::unwrap_used)] // Constant URL is valid
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            phone_number: None,
            store_name: DEFAULT_STORE_NAME.to_string(),
            currency: CurrencyCode::default(),
        }
    }
}

/// A composed order summary and the link that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutHandoff {
    /// Plain-text order summary.
    pub message: String,
    /// Link to open in a new browsing context.
    pub url: Url,
    /// Totals at the time of checkout.
    pub totals: Totals,
    /// Units ordered.
    pub item_count: u32,
}

/// Build the hand-off for `cart` without touching any state.
///
/// # Errors
///
/// Returns `CheckoutError` if the cart is empty or the destination is
/// missing or invalid.
pub fn prepare(
    cart: &Cart,
    totals: &Totals,
    settings: &CheckoutSettings,
) -> Result<CheckoutHandoff, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let phone = settings
        .phone_number
        .as_deref()
        .ok_or(CheckoutError::MissingDestination)?;

    let message = compose_message(cart, totals, &settings.store_name, settings.currency);
    let url = checkout_link(&settings.base_url, phone, &message)?;

    Ok(CheckoutHandoff {
        message,
        url,
        totals: *totals,
        item_count: cart.item_count(),
    })
}

/// Write the order summary.
///
/// ```text
/// Olá! Gostaria de fazer um pedido na StreetStyle:
///
/// 1. Camiseta Isolated (Tamanho: M) - Quantidade: 2 - R$ 179,80
///
/// Subtotal: R$ 179,80
/// Frete: R$ 20,00
/// Total: R$ 199,80
///
/// Aguardamos seu contato para finalizar a compra!
/// ```
#[must_use]
pub fn compose_message(
    cart: &Cart,
    totals: &Totals,
    store_name: &str,
    currency: CurrencyCode,
) -> String {
    let mut message = format!("Olá! Gostaria de fazer um pedido na {store_name}:\n\n");

    for (index, line) in cart.lines().iter().enumerate() {
        let _ = write!(message, "{}. {}", index + 1, line.name);
        if let Some(size) = &line.size {
            let _ = write!(message, " (Tamanho: {size})");
        }
        let _ = writeln!(
            message,
            " - Quantidade: {} - {}",
            line.quantity,
            format_amount(line.line_total(), currency)
        );
    }

    let _ = write!(
        message,
        "\nSubtotal: {}\nFrete: {}\nTotal: {}\n\nAguardamos seu contato para finalizar a compra!",
        format_amount(totals.subtotal, currency),
        format_amount(totals.shipping, currency),
        format_amount(totals.total, currency),
    );

    message
}

/// Build `<base>/<phone>?text=<message>`.
///
/// The message is percent-encoded; everything outside the unreserved set
/// (`A-Z a-z 0-9 - _ . ~`) is escaped, including spaces and newlines.
///
/// # Errors
///
/// Returns `CheckoutError` if `phone` is not digits only or the base URL
/// cannot carry a path.
pub fn checkout_link(base: &Url, phone: &str, message: &str) -> Result<Url, CheckoutError> {
    let phone = normalize_phone(phone)?;

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CheckoutError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push(&phone);
    url.set_query(Some(&format!("text={}", urlencoding::encode(message))));
    Ok(url)
}

/// Strip formatting characters and check the number is digits only.
///
/// # Errors
///
/// Returns `CheckoutError::InvalidDestination` if anything other than
/// digits remains, or if nothing remains.
pub fn normalize_phone(phone: &str) -> Result<String, CheckoutError> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')'))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CheckoutError::InvalidDestination(phone.to_string()));
    }
    Ok(digits)
}
