//! Non-negative price representation using decimal arithmetic.
//!
//! Prices are persisted as plain JSON numbers (the layout browsers already
//! hold in storage) written with every decimal digit, so a saved price loads
//! back unchanged, and rendered with a locale-style [`NumberFormat`]:
//!
//! ```
//! use carrito_core::{NumberFormat, Price};
//! use rust_decimal::Decimal;
//!
//! let price = Price::new(Decimal::new(12345, 1)).unwrap();
//! assert_eq!(price.format(&NumberFormat::default()), "$1.234,5");
//! ```

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a finite decimal number.
    #[error("price is not a number: {0:?}")]
    NotANumber(String),
}

/// A unit or total price. Always `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        if amount.is_zero() {
            return Ok(Self::ZERO);
        }
        Ok(Self(amount))
    }

    /// Parse a price from text.
    ///
    /// Accepts plain decimals (`"19.99"`) and scientific notation (`"1e3"`),
    /// with surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] for unparsable input and
    /// [`PriceError::Negative`] for negative amounts.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::NotANumber(s.to_owned()))?;
        Self::new(amount)
    }

    /// Coerce an optional attribute value into a price.
    ///
    /// Missing, non-numeric and negative values all become [`Price::ZERO`].
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::parse(v).ok())
            .unwrap_or(Self::ZERO)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity.get()))
            .map_or(Self(Decimal::MAX), Self)
    }

    /// Sum of two prices, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        self.0
            .checked_add(other.0)
            .map_or(Self(Decimal::MAX), Self)
    }

    /// Render the price with the given number format, e.g. `$1.000`.
    #[must_use]
    pub fn format(&self, format: &NumberFormat) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(
                format.max_fraction_digits,
                RoundingStrategy::MidpointAwayFromZero,
            )
            .normalize();
        let digits = rounded.to_string();
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut out = String::with_capacity(format.currency_symbol.len() + digits.len() + 4);
        out.push_str(&format.currency_symbol);
        push_grouped(&mut out, integer, format.thousands_separator);
        if !fraction.is_empty() {
            out.push(format.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

/// Append `integer` to `out`, inserting `separator` between groups of three.
fn push_grouped(out: &mut String, integer: &str, separator: char) {
    let len = integer.len();
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&NumberFormat::default()))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::arbitrary_precision::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::arbitrary_precision::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// Locale-style number formatting for displayed prices.
///
/// The default matches Spanish-language storefronts: `$` prefix, `.` between
/// thousands, `,` before decimals, at most three fraction digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    /// Prefix written before the amount.
    pub currency_symbol: String,
    /// Separator between groups of three integer digits.
    pub thousands_separator: char,
    /// Separator between the integer and fraction digits.
    pub decimal_separator: char,
    /// Fraction digits kept after rounding (trailing zeros are dropped).
    pub max_fraction_digits: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_owned(),
            thousands_separator: '.',
            decimal_separator: ',',
            max_fraction_digits: 3,
        }
    }
}
