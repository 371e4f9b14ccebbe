//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::{Cart, CartInvariantError, CartItem};
pub use catalog::{Product, StockInfo};
pub use id::*;
pub use price::Price;
