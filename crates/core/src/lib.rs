//! Carrito Core - Shared cart types.
//!
//! This crate provides the data model used by every Carrito component:
//! - `widget` - Cart store, renderer, event bindings and notifier
//! - `cli` - Command-line driver over a file-backed storage
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no rendering. This keeps it lightweight and allows it to
//! be used anywhere, including `wasm32` builds.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes for item names, prices and quantities,
//!   plus the de-duplicated [`Cart`] itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
