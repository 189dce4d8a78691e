//! Executing catalog requests.
//!
//! `CatalogClient` never touches the network. `Transport` is the seam where
//! an `HttpRequest` turns into an `HttpResponse`, and `Catalog` glues the two
//! together so callers get one call per endpoint. No retries, no caching and
//! no timeout beyond the transport's own default.

use tracing::{debug, warn};

use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Product, ProductId};

/// Performs the HTTP round-trip for a built request.
///
/// Non-2xx responses are data, not errors: implementations return them as
/// `Ok` and leave status interpretation to the client. `Err` is reserved for
/// requests that never produced a response.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[cfg(feature = "blocking")]
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

#[cfg(feature = "blocking")]
impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

#[cfg(feature = "blocking")]
impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.get(&request.path);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Catalog API with the I/O wired in.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    client: CatalogClient,
    transport: T,
}

#[cfg(feature = "blocking")]
impl Catalog<UreqTransport> {
    /// Blocking catalog against `base_url`.
    pub fn blocking(base_url: &str) -> Self {
        Self::new(CatalogClient::new(base_url), UreqTransport::default())
    }
}

impl<T: Transport> Catalog<T> {
    pub fn new(client: CatalogClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.fetch(self.client.build_get_products())?;
        self.client
            .parse_get_products(response)
            .inspect_err(|e| warn!(error = %e, "failed to fetch products"))
    }

    pub fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let response = self.fetch(self.client.build_get_product(id))?;
        self.client
            .parse_get_product(response)
            .inspect_err(|e| warn!(id, error = %e, "failed to fetch product"))
    }

    pub fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let response = self.fetch(self.client.build_get_products_by_category(category))?;
        self.client
            .parse_get_products_by_category(response)
            .inspect_err(|e| warn!(category, error = %e, "failed to fetch products by category"))
    }

    pub fn get_categories(&self) -> Result<Vec<String>, ApiError> {
        let response = self.fetch(self.client.build_get_categories())?;
        self.client
            .parse_get_categories(response)
            .inspect_err(|e| warn!(error = %e, "failed to fetch categories"))
    }

    fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "catalog request");
        self.transport
            .execute(request)
            .inspect(|r| debug!(status = r.status, "catalog response"))
            .inspect_err(|e| warn!(error = %e, "catalog request did not complete"))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Replays canned responses and records every request path.
    struct Scripted {
        responses: RefCell<Vec<Result<HttpResponse, ApiError>>>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(mut responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
            responses.reverse();
            Self {
                responses: RefCell::new(responses),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.path);
            self.responses.borrow_mut().pop().expect("no scripted response left")
        }
    }

    fn ok(body: &str) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn repeated_calls_always_refetch() {
        let transport = Scripted::new(vec![ok(r#"["a"]"#), ok(r#"["a","b"]"#)]);
        let catalog = Catalog::new(CatalogClient::new("http://shop"), &transport);

        assert_eq!(catalog.get_categories().unwrap(), vec!["a"]);
        assert_eq!(catalog.get_categories().unwrap(), vec!["a", "b"]);
        assert_eq!(transport.seen.borrow().len(), 2);
    }

    #[test]
    fn transport_failure_surfaces_as_network_error() {
        let transport = Scripted::new(vec![Err(ApiError::Network("offline".into()))]);
        let catalog = Catalog::new(CatalogClient::new("http://shop"), &transport);

        let err = catalog.get_product(3).unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(transport.seen.borrow().as_slice(), ["http://shop/products/3"]);
    }

    #[test]
    fn category_request_hits_category_route() {
        let transport = Scripted::new(vec![ok("[]")]);
        let catalog = Catalog::new(CatalogClient::new("http://shop"), &transport);

        assert!(catalog.get_products_by_category("jewelery").unwrap().is_empty());
        assert_eq!(
            transport.seen.borrow().as_slice(),
            ["http://shop/products/category/jewelery"]
        );
    }
}
