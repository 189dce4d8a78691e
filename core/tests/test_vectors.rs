//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected request, a simulated
//! response and either the expected parse result or the expected error kind.
//! Results are compared as typed values, not raw strings, so field order in
//! the fixtures does not matter.

use serde::de::DeserializeOwned;
use std::fmt::Debug;
use storefront_core::{
    ApiError, CatalogClient, ErrorKind, HttpMethod, HttpRequest, HttpResponse, Product,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> CatalogClient {
    CatalogClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, case: &serde_json::Value) {
    let expected = &case["expected_request"];
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert!(req.body.is_none(), "{name}: body should be None");
}

fn check_result<T>(name: &str, result: Result<T, ApiError>, case: &serde_json::Value)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        let kind = match expected_error.as_str().unwrap() {
            "Network" => ErrorKind::Network,
            "Decode" => ErrorKind::Decode,
            other => panic!("{name}: unknown expected_error: {other}"),
        };
        assert_eq!(err.kind(), kind, "{name}: error kind ({err})");
    } else {
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

fn cases(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

#[test]
fn get_products_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get_products.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_get_products(), &case);
        check_result::<Vec<Product>>(name, c.parse_get_products(simulated_response(&case)), &case);
    }
}

#[test]
fn get_product_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get_product.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap() as u32;
        check_request(name, &c.build_get_product(id), &case);
        check_result::<Product>(name, c.parse_get_product(simulated_response(&case)), &case);
    }
}

#[test]
fn get_products_by_category_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get_products_by_category.json")) {
        let name = case["name"].as_str().unwrap();
        let category = case["input_category"].as_str().unwrap();
        check_request(name, &c.build_get_products_by_category(category), &case);
        check_result::<Vec<Product>>(
            name,
            c.parse_get_products_by_category(simulated_response(&case)),
            &case,
        );
    }
}

#[test]
fn get_categories_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get_categories.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_get_categories(), &case);
        check_result::<Vec<String>>(name, c.parse_get_categories(simulated_response(&case)), &case);
    }
}
