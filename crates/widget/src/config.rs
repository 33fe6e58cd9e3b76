//! Widget configuration loaded from environment variables.
//!
//! Every setting has a default matching the stock page markup, so an empty
//! environment yields [`WidgetConfig::default`].
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CARRITO_STORAGE_KEY` - Storage entry holding the cart (default: carrito)
//! - `CARRITO_COUNTER_SELECTOR` - Counter badge (default: .cart-count)
//! - `CARRITO_SUMMARY_SELECTOR` - Summary panel (default: .cart-resumen)
//! - `CARRITO_BUY_SELECTOR` - Buy controls (default: .btn-comprar)
//! - `CARRITO_BUMP_MS` - Counter bump duration (default: 300)
//! - `CARRITO_TOAST_SHOW_DELAY_MS` - Delay before a toast fades in (default: 10)
//! - `CARRITO_TOAST_MS` - Time a toast stays visible (default: 2000)
//! - `CARRITO_TOAST_FADE_MS` - Fade-out before the toast is removed (default: 300)
//! - `CARRITO_DEFAULT_NAME` - Name for controls without one (default: Producto sin nombre)
//! - `CARRITO_DEFAULT_IMAGE` - Image for controls without one (default: ./img/default.jpg)
//! - `CARRITO_CURRENCY_SYMBOL` - Price prefix (default: $)
//! - `CARRITO_THOUSANDS_SEPARATOR` - Digit group separator (default: .)
//! - `CARRITO_DECIMAL_SEPARATOR` - Decimal separator (default: ,)
//! - `CARRITO_FRACTION_DIGITS` - Maximum fraction digits shown (default: 3)

use std::time::Duration;

use carrito_core::{DEFAULT_IMAGE, ItemName, NumberFormat};
use thiserror::Error;

use crate::store::DEFAULT_STORAGE_KEY;

/// Largest scale a `rust_decimal::Decimal` supports.
const MAX_FRACTION_DIGITS: u32 = 28;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Storage entry holding the persisted cart
    pub storage_key: String,
    /// Where the widget finds its surfaces and controls
    pub selectors: SelectorConfig,
    /// Counter emphasis effect
    pub bump: BumpConfig,
    /// Toast notification timing
    pub toast: ToastConfig,
    /// Fallbacks for buy controls with missing attributes
    pub defaults: ItemDefaults,
    /// Price display format
    pub number_format: NumberFormat,
}

/// Class selectors for the page surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Counter badge showing the total quantity
    pub counter: String,
    /// Floating order summary
    pub summary: String,
    /// Buy controls carrying item data attributes
    pub buy_control: String,
}

/// Counter bump effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpConfig {
    /// Class toggled on the counter
    pub class: String,
    /// Time before the class is removed again
    pub duration: Duration,
}

/// Toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastConfig {
    /// Class of the toast element
    pub class: String,
    /// Class that makes the toast visible
    pub show_class: String,
    /// Delay between inserting the toast and showing it
    pub show_delay: Duration,
    /// Time the toast stays visible
    pub duration: Duration,
    /// Time between hiding the toast and removing it
    pub fade: Duration,
}

/// Values used when a buy control omits an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefaults {
    /// Item name fallback
    pub name: ItemName,
    /// Image reference fallback
    pub image: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            selectors: SelectorConfig::default(),
            bump: BumpConfig::default(),
            toast: ToastConfig::default(),
            defaults: ItemDefaults::default(),
            number_format: NumberFormat::default(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            counter: ".cart-count".to_string(),
            summary: ".cart-resumen".to_string(),
            buy_control: ".btn-comprar".to_string(),
        }
    }
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self {
            class: "cart-bump".to_string(),
            duration: Duration::from_millis(300),
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            class: "toast-cart".to_string(),
            show_class: "show".to_string(),
            show_delay: Duration::from_millis(10),
            duration: Duration::from_millis(2000),
            fade: Duration::from_millis(300),
        }
    }
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            name: ItemName::default(),
            image: DEFAULT_IMAGE.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);
        let base = Self::default();

        let default_name = match env.get("CARRITO_DEFAULT_NAME") {
            Some(value) => ItemName::parse(&value).map_err(|e| {
                ConfigError::InvalidEnvVar("CARRITO_DEFAULT_NAME".to_string(), e.to_string())
            })?,
            None => base.defaults.name,
        };

        let fraction_digits = env.parse_or(
            "CARRITO_FRACTION_DIGITS",
            base.number_format.max_fraction_digits,
        )?;
        if fraction_digits > MAX_FRACTION_DIGITS {
            return Err(ConfigError::InvalidEnvVar(
                "CARRITO_FRACTION_DIGITS".to_string(),
                format!("must be at most {MAX_FRACTION_DIGITS}"),
            ));
        }

        Ok(Self {
            storage_key: env.non_empty_or("CARRITO_STORAGE_KEY", base.storage_key)?,
            selectors: SelectorConfig {
                counter: env.non_empty_or("CARRITO_COUNTER_SELECTOR", base.selectors.counter)?,
                summary: env.non_empty_or("CARRITO_SUMMARY_SELECTOR", base.selectors.summary)?,
                buy_control: env
                    .non_empty_or("CARRITO_BUY_SELECTOR", base.selectors.buy_control)?,
            },
            bump: BumpConfig {
                class: base.bump.class,
                duration: env.millis_or("CARRITO_BUMP_MS", base.bump.duration)?,
            },
            toast: ToastConfig {
                class: base.toast.class,
                show_class: base.toast.show_class,
                show_delay: env.millis_or("CARRITO_TOAST_SHOW_DELAY_MS", base.toast.show_delay)?,
                duration: env.millis_or("CARRITO_TOAST_MS", base.toast.duration)?,
                fade: env.millis_or("CARRITO_TOAST_FADE_MS", base.toast.fade)?,
            },
            defaults: ItemDefaults {
                name: default_name,
                image: env.non_empty_or("CARRITO_DEFAULT_IMAGE", base.defaults.image)?,
            },
            number_format: NumberFormat {
                currency_symbol: env
                    .get("CARRITO_CURRENCY_SYMBOL")
                    .unwrap_or(base.number_format.currency_symbol),
                thousands_separator: env.char_or(
                    "CARRITO_THOUSANDS_SEPARATOR",
                    base.number_format.thousands_separator,
                )?,
                decimal_separator: env.char_or(
                    "CARRITO_DECIMAL_SEPARATOR",
                    base.number_format.decimal_separator,
                )?,
                max_fraction_digits: fraction_digits,
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source with typed accessors.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a variable that must not be blank when set.
    fn non_empty_or(&self, key: &str, default: String) -> Result<String, ConfigError> {
        match self.get(key) {
            Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be empty".to_string(),
            )),
            Some(value) => Ok(value),
            None => Ok(default),
        }
    }

    /// Parse a variable with a default value.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a millisecond duration with a default value.
    fn millis_or(&self, key: &str, default: Duration) -> Result<Duration, ConfigError> {
        let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
        self.parse_or(key, default_ms).map(Duration::from_millis)
    }

    /// Parse a single-character variable with a default value.
    fn char_or(&self, key: &str, default: char) -> Result<char, ConfigError> {
        // Not trimmed: a space is a valid group separator.
        self.get(key).map_or(Ok(default), |value| {
            value
                .parse::<char>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
