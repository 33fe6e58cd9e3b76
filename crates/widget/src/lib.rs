//! Carrito Widget - persisted shopping cart for storefront pages.
//!
//! This crate keeps a cart in origin-scoped key-value storage and keeps two
//! page surfaces in sync with it: a counter badge and a floating summary.
//! Buy controls on the page add items; writes made by other tabs refresh
//! the views.
//!
//! # Architecture
//!
//! - [`store`] - Load/save of the persisted cart (fails soft on bad data)
//! - [`storage`] - `localStorage`-style backends and cross-tab events
//! - [`render`] - Counter and summary views (Askama templates)
//! - [`bindings`] - Page-ready, click and storage-event handlers
//! - [`notifier`] - Toast feedback after an add
//! - [`document`] / [`scheduler`] - Page access and cosmetic timers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bindings;
pub mod config;
pub mod document;
pub mod error;
pub mod notifier;
pub mod render;
pub mod scheduler;
pub mod storage;
pub mod store;

pub use bindings::{BuyAttributes, CartWidget};
pub use config::{ConfigError, WidgetConfig};
pub use error::{Result, StorageError, WidgetError};
pub use store::{CartStore, StorageCartStore};
