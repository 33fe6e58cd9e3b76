//! Persisted cart store.
//!
//! The cart lives under a single storage key as a JSON array of lines. The
//! store is the only component that touches that entry; everything else
//! goes through [`CartStore::load`] and [`CartStore::save`].

use carrito_core::{Cart, CartItem};
use serde_json::value::RawValue;
use tracing::warn;

use crate::error::Result;
use crate::storage::KeyValueStorage;

/// Storage key the cart is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "carrito";

/// Load/save access to the persisted cart.
pub trait CartStore {
    /// Read the persisted cart.
    ///
    /// Never fails: a missing, unreadable or malformed entry yields an empty
    /// cart.
    fn load(&self) -> Cart;

    /// Persist `cart`, overwriting whatever was stored before.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be encoded or the storage backend
    /// rejects the write.
    fn save(&self, cart: &Cart) -> Result<()>;
}

/// [`CartStore`] over any [`KeyValueStorage`].
#[derive(Debug, Clone)]
pub struct StorageCartStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> StorageCartStore<S> {
    /// Store the cart in `storage` under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> CartStore for StorageCartStore<S> {
    fn load(&self) -> Cart {
        match self.storage.get_item(&self.key) {
            Ok(raw) => decode_cart(raw.as_deref()),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read persisted cart");
                Cart::new()
            }
        }
    }

    fn save(&self, cart: &Cart) -> Result<()> {
        let json = serde_json::to_string(cart)?;
        self.storage.set_item(&self.key, &json)?;
        Ok(())
    }
}

/// Decode a persisted cart value.
///
/// Absent values and values that are not a JSON array yield an empty cart.
/// Lines that fail validation (blank name, price out of range, quantity
/// below one) are dropped one by one; the remaining lines are kept.
#[must_use]
pub fn decode_cart(raw: Option<&str>) -> Cart {
    let Some(text) = raw else {
        return Cart::new();
    };
    let lines: Vec<Box<RawValue>> = match serde_json::from_str(text) {
        Ok(lines) => lines,
        Err(e) => {
            warn!(error = %e, "Discarding malformed persisted cart");
            return Cart::new();
        }
    };
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            serde_json::from_str::<CartItem>(line.get())
                .inspect_err(|e| warn!(index, error = %e, "Dropping invalid persisted cart line"))
                .ok()
        })
        .collect()
}
