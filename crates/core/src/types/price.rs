//! Currency formatting for decimal amounts.
//!
//! Amounts are kept as [`Decimal`] in the currency's standard unit (reais,
//! not centavos) so that sums like `89.90 * 3` stay exact.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Currency symbol placed before the amount.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }

    const fn separators(self) -> (char, char) {
        // (thousands, decimal)
        match self {
            Self::BRL | Self::EUR => ('.', ','),
            Self::USD => (',', '.'),
        }
    }

    const fn symbol_spacing(self) -> &'static str {
        match self {
            Self::BRL | Self::EUR => " ",
            Self::USD => "",
        }
    }
}

/// Format an amount with two decimal places and locale separators.
///
/// Rounds half away from zero, the way prices are shown on receipts.
///
/// ```
/// use rust_decimal::Decimal;
/// use streetstyle_core::{CurrencyCode, format_amount};
///
/// assert_eq!(format_amount(Decimal::new(26970, 2), CurrencyCode::BRL), "R$ 269,70");
/// assert_eq!(format_amount(Decimal::new(123_456, 2), CurrencyCode::BRL), "R$ 1.234,56");
/// assert_eq!(format_amount(Decimal::new(123_456, 2), CurrencyCode::USD), "$1,234.56");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal, currency: CurrencyCode) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let (thousands, decimal) = currency.separators();

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(*digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!(
        "{sign}{}{}{grouped}{decimal}{fraction}",
        currency.symbol(),
        currency.symbol_spacing()
    )
}
