//! Core types for Carrito.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod name;
pub mod price;
pub mod quantity;

pub use cart::{Cart, CartItem, DEFAULT_IMAGE};
pub use name::{ItemName, ItemNameError};
pub use price::{NumberFormat, Price, PriceError};
pub use quantity::{Quantity, QuantityError};
