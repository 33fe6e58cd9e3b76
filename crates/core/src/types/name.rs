//! Item name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ItemName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemNameError {
    /// The input string is empty or only whitespace.
    #[error("item name cannot be empty")]
    Empty,
}

/// The name of a cart item.
///
/// The name is the de-duplication key of a [`Cart`](crate::Cart): adding an
/// item whose name is already present increments that line's quantity.
/// Names are compared exactly (case and surrounding whitespace matter), so
/// they are stored as given.
///
/// ## Constraints
///
/// - Must contain at least one non-whitespace character
///
/// ## Examples
///
/// ```
/// use carrito_core::ItemName;
///
/// assert!(ItemName::parse("Widget").is_ok());
/// assert!(ItemName::parse("").is_err());
/// assert!(ItemName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Name used when a buy control does not supply one.
    pub const FALLBACK: &'static str = "Producto sin nombre";

    /// Parse an `ItemName` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ItemNameError::Empty`] if the input is empty or whitespace.
    pub fn parse(s: &str) -> Result<Self, ItemNameError> {
        if s.trim().is_empty() {
            return Err(ItemNameError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Parse an optional attribute value, falling back to `default` when it
    /// is absent or blank.
    #[must_use]
    pub fn from_attribute(value: Option<&str>, default: &Self) -> Self {
        value
            .and_then(|v| Self::parse(v).ok())
            .unwrap_or_else(|| default.clone())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ItemName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for ItemName {
    fn default() -> Self {
        Self(Self::FALLBACK.to_owned())
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ItemName {
    type Err = ItemNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemName {
    type Error = ItemNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(ItemNameError::Empty);
        }
        Ok(Self(value))
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
