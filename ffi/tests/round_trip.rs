//! Drive the C surface end to end: build a request, execute it against the
//! mock server with ureq, parse the response, and put the product in a cart.

use std::ffi::{CStr, CString};

use storefront_ffi::types::{FfiDataTag, FfiErrorCode, FfiHttpRequest, FfiHttpResponse, FfiProduct, FfiProductList};
use storefront_ffi::*;

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Execute a C request the way a host would, returning (status, body).
fn execute(req: *mut FfiHttpRequest) -> (u16, CString) {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let path = unsafe { CStr::from_ptr((*req).path) }.to_str().unwrap().to_string();
    storefront_free_request(req);

    let mut response = agent.get(&path).call().expect("HTTP transport error");
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    (status, CString::new(body).unwrap())
}

#[test]
fn list_then_add_to_cart() {
    let base_url = CString::new(start_server()).unwrap();
    let client = storefront_client_new(base_url.as_ptr());

    let (status, body) = execute(storefront_build_get_products(client));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = storefront_parse_get_products(client, &resp);
    let r = unsafe { &*result };
    assert!(matches!(r.error_code, FfiErrorCode::Ok));
    assert!(matches!(r.data_tag, FfiDataTag::ProductList));

    let list = unsafe { &*(r.data as *const FfiProductList) };
    let products: &[FfiProduct] = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
    assert_eq!(products.len(), 6);

    let cart = storefront_cart_new();
    storefront_cart_add(cart, &products[0]);
    storefront_cart_add(cart, &products[1]);
    storefront_cart_add(cart, &products[1]);
    assert_eq!(storefront_cart_total_items(cart), 3);
    let expected = products[0].price + 2.0 * products[1].price;
    assert!((storefront_cart_total_price(cart) - expected).abs() < 1e-9);

    storefront_cart_free(cart);
    storefront_free_result(result);
    storefront_client_free(client);
}

#[test]
fn missing_product_reports_http_404() {
    let base_url = CString::new(start_server()).unwrap();
    let client = storefront_client_new(base_url.as_ptr());

    let (status, body) = execute(storefront_build_get_product(client, 404));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = storefront_parse_get_product(client, &resp);
    let r = unsafe { &*result };
    assert!(matches!(r.error_code, FfiErrorCode::Http));
    assert_eq!(r.http_status, 404);

    storefront_free_result(result);
    storefront_client_free(client);
}
