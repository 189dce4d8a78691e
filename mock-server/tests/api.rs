use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, seed_catalog, Product};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_products_returns_whole_catalog_in_order() {
    let resp = app().oneshot(get("/products")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    assert_eq!(products, seed_catalog());
}

#[tokio::test]
async fn list_products_empty_catalog() {
    let resp = app_with(Vec::new()).oneshot(get("/products")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await.as_ref(), b"[]");
}

// --- get ---

#[tokio::test]
async fn get_product_by_id() {
    let resp = app().oneshot(get("/products/9")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let product: Product = body_json(resp).await;
    assert_eq!(product.id, 9);
    assert_eq!(product.category, "electronics");
}

#[tokio::test]
async fn get_product_not_found() {
    let resp = app().oneshot(get("/products/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_product_bad_id_returns_400() {
    let resp = app().oneshot(get("/products/not-a-number")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- category ---

#[tokio::test]
async fn products_by_category_decodes_path() {
    let resp = app()
        .oneshot(get("/products/category/men%27s%20clothing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    let ids: Vec<_> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn products_by_unknown_category_is_empty() {
    let resp = app().oneshot(get("/products/category/toys")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn category_match_is_exact() {
    let resp = app().oneshot(get("/products/category/Electronics")).await.unwrap();
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}

// --- categories ---

#[tokio::test]
async fn categories_are_distinct_in_first_seen_order() {
    let resp = app().oneshot(get("/products/categories")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let categories: Vec<String> = body_json(resp).await;
    assert_eq!(
        categories,
        vec!["men's clothing", "jewelery", "electronics", "women's clothing"]
    );
}

// --- read-only ---

#[tokio::test]
async fn writes_are_not_routed() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/products")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
