//! Derived cart totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Cart;

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotals at or above this ship free.
    pub threshold: Decimal,
    /// Fee charged when `0 < subtotal < threshold`.
    pub flat_fee: Decimal,
}

impl ShippingPolicy {
    /// Default free-shipping threshold (R$ 300,00).
    pub const DEFAULT_THRESHOLD: Decimal = Decimal::from_parts(300, 0, 0, false, 0);
    /// Default flat fee (R$ 20,00).
    pub const DEFAULT_FLAT_FEE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

    /// Create a policy.
    #[must_use]
    pub const fn new(threshold: Decimal, flat_fee: Decimal) -> Self {
        Self {
            threshold,
            flat_fee,
        }
    }

    /// Shipping owed on `subtotal`.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > Decimal::ZERO && subtotal < self.threshold {
            self.flat_fee
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD, Self::DEFAULT_FLAT_FEE)
    }
}

/// Subtotal, shipping and total for a cart. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Compute totals for `cart` under `shipping`.
    #[must_use]
    pub fn compute(cart: &Cart, shipping: &ShippingPolicy) -> Self {
        let subtotal = cart.subtotal();
        let shipping = shipping.shipping_for(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    /// All-zero totals of an empty cart.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            shipping: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}
