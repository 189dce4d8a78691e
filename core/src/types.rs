//! Catalog DTOs as served by the Fake Store API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently so
//! the FFI surface is not coupled to axum. Integration tests catch drift
//! between the two crates.

use serde::{Deserialize, Serialize};

/// Catalog identifier for a product.
pub type ProductId = u32;

/// Aggregate customer rating attached to a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of reviews behind `rate`.
    pub count: u32,
}

/// A single catalog product. Read-only: the storefront never writes
/// products back to the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in whole dollars.
    pub price: f64,
    pub description: String,
    pub category: String,
    /// Image URL.
    pub image: String,
    pub rating: Rating,
}
