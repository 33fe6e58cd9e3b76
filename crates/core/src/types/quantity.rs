//! Positive item quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QuantityError {
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    Zero,
    /// The stored number is not finite or is below one.
    #[error("quantity must be a finite number >= 1 (got {0})")]
    OutOfRange(f64),
}

/// Number of units of a cart line. Always `>= 1`.
///
/// Stored as an integer; when read back from storage any JSON number is
/// accepted and truncated, since older writers persisted raw attribute
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `value` is 0.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(value))
    }

    /// Coerce an optional attribute value into a quantity.
    ///
    /// Missing or non-numeric values become 1, fractional values are
    /// truncated, anything below 1 is raised to 1 and anything above
    /// `u32::MAX` is clamped.
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map_or(Self::ONE, Self::clamped)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range first
    fn clamped(value: f64) -> Self {
        let whole = value.trunc().clamp(1.0, f64::from(u32::MAX));
        Self(whole as u32)
    }

    /// The number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Sum of two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 1.0 {
            return Err(QuantityError::OutOfRange(value));
        }
        Ok(Self::clamped(value))
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_from_attribute_floor_is_one() {
        assert_eq!(Quantity::from_attribute(None), Quantity::ONE);
        assert_eq!(Quantity::from_attribute(Some("0")), Quantity::ONE);
        assert_eq!(Quantity::from_attribute(Some("-4")), Quantity::ONE);
        assert_eq!(Quantity::from_attribute(Some("abc")), Quantity::ONE);
        assert_eq!(Quantity::from_attribute(Some("")), Quantity::ONE);
        assert_eq!(Quantity::from_attribute(Some("inf")), Quantity::ONE);
    }

    #[test]
    fn test_from_attribute_parses_numbers() {
        assert_eq!(Quantity::from_attribute(Some("3")).get(), 3);
        assert_eq!(Quantity::from_attribute(Some(" 2 ")).get(), 2);
        assert_eq!(Quantity::from_attribute(Some("2.9")).get(), 2);
        assert_eq!(Quantity::from_attribute(Some("1e2")).get(), 100);
        assert_eq!(Quantity::from_attribute(Some("1e12")).get(), u32::MAX);
    }

    #[test]
    fn test_saturating_add() {
        let big = Quantity::new(u32::MAX).unwrap();
        assert_eq!(big.saturating_add(Quantity::ONE).get(), u32::MAX);
        assert_eq!(Quantity::ONE.saturating_add(Quantity::ONE).get(), 2);
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let q: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(q.get(), 4);
        let q: Quantity = serde_json::from_str("2.5").unwrap();
        assert_eq!(q.get(), 2);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("\"3\"").is_err());
        assert_eq!(serde_json::to_string(&q).unwrap(), "2");
    }
}
