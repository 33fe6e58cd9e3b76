//! Origin-scoped key-value storage.
//!
//! [`KeyValueStorage`] is the `localStorage` contract the cart store is built
//! on: string keys, string values, whole-value overwrites. Every browsing
//! context of an origin sees the same entries; a write in one context is
//! announced to the others as a [`StorageEvent`].
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process origin shared by any number of contexts
//! - [`FileStorage`] - a JSON file, used by the CLI
//! - `LocalStorage` - `window.localStorage` (`web` feature)

use std::sync::Arc;

use uuid::Uuid;

use crate::error::StorageError;

mod file;
mod memory;
#[cfg(feature = "web")]
mod web;

pub use file::FileStorage;
pub use memory::{MemoryContext, MemoryStorage, StorageEvents};
#[cfg(feature = "web")]
pub use web::LocalStorage;

/// A string key-value store shared by every context of an origin.
pub trait KeyValueStorage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// Identifies one browsing context (tab) of an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    /// A fresh, unique context id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification that a storage entry changed in another context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key of the entry that changed.
    pub key: String,
    /// Value before the write.
    pub old_value: Option<String>,
    /// Value after the write.
    pub new_value: Option<String>,
    /// Context that performed the write.
    pub source: ContextId,
}

impl StorageEvent {
    /// An event originating outside this process (another tab, another CLI
    /// invocation).
    #[must_use]
    pub fn external(
        key: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            old_value,
            new_value,
            source: ContextId::new(),
        }
    }
}
