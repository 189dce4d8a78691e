//! In-process stand-in for the Fake Store catalog API.
//!
//! Serves the four read-only routes the storefront uses over a fixed
//! catalog. Used by the integration tests of the core and FFI crates and for
//! local development against `cargo run -p mock-server`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

pub type Catalog = Arc<Vec<Product>>;

/// Products served by `app()`, in listing order.
pub fn seed_catalog() -> Vec<Product> {
    serde_json::from_str(include_str!("../fixtures/catalog.json"))
        .unwrap_or_else(|e| panic!("fixtures/catalog.json is malformed: {e}"))
}

pub fn app() -> Router {
    app_with(seed_catalog())
}

pub fn app_with(products: Vec<Product>) -> Router {
    let catalog: Catalog = Arc::new(products);
    Router::new()
        .route("/products", get(list_products))
        .route("/products/categories", get(list_categories))
        .route("/products/category/{category}", get(products_by_category))
        .route("/products/{id}", get(get_product))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(State(catalog): State<Catalog>) -> Json<Vec<Product>> {
    Json(catalog.as_ref().clone())
}

async fn get_product(
    State(catalog): State<Catalog>,
    Path(id): Path<u32>,
) -> Result<Json<Product>, StatusCode> {
    debug!(id, "get product");
    catalog
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn products_by_category(
    State(catalog): State<Catalog>,
    Path(category): Path<String>,
) -> Json<Vec<Product>> {
    debug!(%category, "products by category");
    Json(
        catalog
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect(),
    )
}

async fn list_categories(State(catalog): State<Catalog>) -> Json<Vec<String>> {
    let mut categories: Vec<String> = Vec::new();
    for product in catalog.iter() {
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    Json(categories)
}
