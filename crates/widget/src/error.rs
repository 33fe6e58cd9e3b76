//! Error types for the cart widget.
//!
//! Most failures in the widget are soft: malformed storage reads as an empty
//! cart, bad attributes are coerced and missing surfaces are skipped. The
//! errors below are the ones that reach a caller, which in practice means
//! persisting the cart failed.

use thiserror::Error;

/// Failure of a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached (no window, storage disabled, quota).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a key-value object.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Widget-level error type.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// A view template failed to render.
    #[error("Template error: {0}")]
    Render(#[from] askama::Error),
}

/// Result type alias for `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;
