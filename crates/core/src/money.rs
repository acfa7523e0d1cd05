//! Money display formatting.
//!
//! Formatting is driven by an explicit [`MoneyFormat`] rather than the host
//! locale, so output is deterministic across machines.
//!
//! Rules shared by both forms:
//!
//! - the amount is rounded to a whole unit, half away from zero
//!   (`2.5 -> 3`, `-2.5 -> -3`);
//! - digits are grouped in threes with the configured separator;
//! - negative amounts get a leading `-`; an amount that rounds to zero is
//!   printed without a sign.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors from the `f64` formatting entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyFormatError {
    /// NaN or an infinity.
    #[error("amount is not a finite number")]
    NonFinite,
    /// Finite, but outside the range a `Decimal` can hold.
    #[error("amount is out of range")]
    OutOfRange,
}

/// Locale settings for money display.
///
/// ```
/// use rust_decimal::Decimal;
/// use storedesk_core::MoneyFormat;
///
/// let vnd = MoneyFormat::default();
/// assert_eq!(vnd.format_long(Decimal::from(25_000)), "25.000 VND");
/// assert_eq!(vnd.format_short(Decimal::from(25_000)), "25.000đ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyFormat {
    /// BCP 47 locale tag the other fields were taken from. Informational.
    pub locale: String,
    /// Thousands separator.
    pub grouping_separator: String,
    /// ISO 4217 code used by the long form.
    pub currency_code: String,
    /// Glyph used by the short form.
    pub currency_symbol: String,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            locale: "vi-VN".to_owned(),
            grouping_separator: ".".to_owned(),
            currency_code: "VND".to_owned(),
            currency_symbol: "đ".to_owned(),
        }
    }
}

impl MoneyFormat {
    /// Long form: grouped whole amount followed by a space and the currency code.
    #[must_use]
    pub fn format_long(&self, amount: Decimal) -> String {
        format!("{} {}", self.group(amount), self.currency_code)
    }

    /// Short form: grouped whole amount immediately followed by the currency glyph.
    #[must_use]
    pub fn format_short(&self, amount: Decimal) -> String {
        format!("{}{}", self.group(amount), self.currency_symbol)
    }

    /// [`format_long`](Self::format_long) for a floating-point amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyFormatError`] for NaN, infinities and out-of-range values.
    pub fn format_long_f64(&self, amount: f64) -> Result<String, MoneyFormatError> {
        to_decimal(amount).map(|d| self.format_long(d))
    }

    /// [`format_short`](Self::format_short) for a floating-point amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyFormatError`] for NaN, infinities and out-of-range values.
    pub fn format_short_f64(&self, amount: f64) -> Result<String, MoneyFormatError> {
        to_decimal(amount).map(|d| self.format_short(d))
    }

    fn group(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().normalize().to_string();

        let mut out = String::with_capacity(digits.len() * 2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        let len = digits.len();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(&self.grouping_separator);
            }
            out.push(ch);
        }
        out
    }
}

fn to_decimal(amount: f64) -> Result<Decimal, MoneyFormatError> {
    if !amount.is_finite() {
        return Err(MoneyFormatError::NonFinite);
    }
    Decimal::from_f64(amount).ok_or(MoneyFormatError::OutOfRange)
}
