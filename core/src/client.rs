//! Stateless HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Nothing is cached: building the same request twice
//! always means fetching twice.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Product, ProductId};

/// Host of the public Fake Store API.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Synchronous, stateless client for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_products(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/products", self.base_url))
    }

    pub fn build_get_product(&self, id: ProductId) -> HttpRequest {
        HttpRequest::get(format!("{}/products/{id}", self.base_url))
    }

    pub fn build_get_products_by_category(&self, category: &str) -> HttpRequest {
        let segment = utf8_percent_encode(category, PATH_SEGMENT);
        HttpRequest::get(format!("{}/products/category/{segment}", self.base_url))
    }

    pub fn build_get_categories(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/products/categories", self.base_url))
    }

    pub fn parse_get_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        decode(response)
    }

    /// A missing product is reported like any other failed fetch.
    pub fn parse_get_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        decode(response)
    }

    pub fn parse_get_products_by_category(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Product>, ApiError> {
        decode(response)
    }

    pub fn parse_get_categories(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    Ok(serde_json::from_str(&response.body)?)
}

/// Map non-success status codes to `ApiError::Status`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
