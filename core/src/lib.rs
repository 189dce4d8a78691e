//! Storefront core: catalog client and shopping cart.
//!
//! # Overview
//! Everything a storefront view needs below the rendering layer: a
//! read-only client for the Fake Store catalog API, the session cart with
//! its observers, and the order summary shown on the cart page.
//!
//! # Design
//! - `CatalogClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`. `Catalog` pairs it
//!   with a `Transport` for callers that want one call per endpoint.
//! - `Cart` is a single owned value with explicit mutation methods; views
//!   subscribe to it instead of polling.
//! - Types use owned `String` / `Vec` fields to keep FFI mapping simple.

pub mod cart;
pub mod client;
pub mod display;
pub mod error;
pub mod http;
pub mod summary;
pub mod transport;
pub mod types;

pub use cart::{Cart, CartEvent, CartItem, SubscriptionId};
pub use client::{CatalogClient, DEFAULT_BASE_URL};
pub use display::{format_price, truncate_title};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use summary::OrderSummary;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
pub use transport::{Catalog, Transport};
pub use types::{Product, ProductId, Rating};
