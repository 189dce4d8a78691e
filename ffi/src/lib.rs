//! C-ABI wrapper around `storefront-core`.
//!
//! # Overview
//! Exposes the catalog client and the session cart through `extern "C"`
//! functions so a host UI written in any language with a C FFI can build and
//! parse catalog requests and drive the cart.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-endpoint `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiCatalogResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `storefront_*_free` / `storefront_free_*` function to release them.

pub mod types;

use std::ffi::{c_void, CString};
use std::num::NonZeroU32;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use storefront_core::{format_price, Cart, HttpResponse, OrderSummary};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CatalogClient` bound to `base_url`, or to the public Fake
/// Store API when `base_url` is null.
///
/// The caller must free the returned pointer with `storefront_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_client_new(base_url: *const c_char) -> *mut FfiCatalogClient {
    catch_unwind(|| {
        let client = if base_url.is_null() {
            storefront_core::CatalogClient::default()
        } else {
            storefront_core::CatalogClient::new(unsafe { str_from_ptr(base_url) })
        };
        Box::into_raw(Box::new(FfiCatalogClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `storefront_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_client_free(client: *mut FfiCatalogClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request listing every product.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `storefront_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_build_get_products(
    client: *const FfiCatalogClient,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_products())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a single product.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_build_get_product(
    client: *const FfiCatalogClient,
    id: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_product(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request listing the products of one category.
///
/// Returns null if `client` or `category` is null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_build_get_products_by_category(
    client: *const FfiCatalogClient,
    category: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || category.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let category = unsafe { str_from_ptr(category) };
        FfiHttpRequest::from_core(client.inner.build_get_products_by_category(category))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request listing category names.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_build_get_categories(
    client: *const FfiCatalogClient,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_categories())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as an empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { str_from_ptr(resp.body) }.to_string()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Shared null checks and conversion for every `storefront_parse_*`.
fn parse_with(
    name: &str,
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&storefront_core::CatalogClient, HttpResponse) -> *mut FfiCatalogResult,
) -> *mut FfiCatalogResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiCatalogResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCatalogResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        parse(&client.inner, ffi_response_to_core(resp))
    }))
    .unwrap_or_else(|_| FfiCatalogResult::panic(&format!("panic in {name}")))
}

/// Parse the response to `storefront_build_get_products`.
///
/// Returns a result with `data_tag = ProductList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_parse_get_products(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    parse_with("storefront_parse_get_products", client, response, |c, r| {
        match c.parse_get_products(r) {
            Ok(products) => FfiCatalogResult::ok_product_list(products),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
}

/// Parse the response to `storefront_build_get_product`.
///
/// Returns a result with `data_tag = Product` on success. A missing product
/// comes back as an ordinary `Http` or `Decode` failure.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_parse_get_product(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    parse_with("storefront_parse_get_product", client, response, |c, r| {
        match c.parse_get_product(r) {
            Ok(product) => FfiCatalogResult::ok_product(product),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
}

/// Parse the response to `storefront_build_get_products_by_category`.
///
/// Returns a result with `data_tag = ProductList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_parse_get_products_by_category(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    parse_with("storefront_parse_get_products_by_category", client, response, |c, r| {
        match c.parse_get_products_by_category(r) {
            Ok(products) => FfiCatalogResult::ok_product_list(products),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
}

/// Parse the response to `storefront_build_get_categories`.
///
/// Returns a result with `data_tag = CategoryList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_parse_get_categories(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    parse_with("storefront_parse_get_categories", client, response, |c, r| {
        match c.parse_get_categories(r) {
            Ok(categories) => FfiCatalogResult::ok_category_list(categories),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// Create an empty cart. Free it with `storefront_cart_free`.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_new() -> *mut FfiCart {
    catch_unwind(|| Box::into_raw(Box::new(FfiCart::new()))).unwrap_or(std::ptr::null_mut())
}

/// Free a cart and drop its observers. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_free(cart: *mut FfiCart) {
    if !cart.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(cart) });
        }));
    }
}

/// Run `f` on the cart behind `cart`, or return `fallback` when it is null
/// or `f` panics.
fn with_cart<R>(cart: *mut FfiCart, fallback: R, f: impl FnOnce(&mut Cart) -> R) -> R {
    if cart.is_null() {
        return fallback;
    }
    match catch_unwind(AssertUnwindSafe(|| f(unsafe { &mut (*cart).inner }))) {
        Ok(value) => value,
        Err(_) => fallback,
    }
}

/// `with_cart` for mutations: once `f` has returned and its borrow has ended,
/// deliver the events it raised to the C observers.
fn mutate_cart<R>(cart: *mut FfiCart, fallback: R, f: impl FnOnce(&mut Cart) -> R) -> R {
    let result = with_cart(cart, fallback, f);
    if !cart.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| dispatch(cart)));
    }
    result
}

/// Drain the cart's event queue into the C observers.
///
/// Only short borrows of the cart are taken between callbacks, never across
/// one, so a callback may read the cart, mutate it or change subscriptions.
/// A nested call finds `dispatching` set and leaves its events queued for the
/// outer loop, which keeps delivery in mutation order. Each event goes to the
/// observers subscribed when it is dequeued, minus any unsubscribed since.
fn dispatch(cart: *mut FfiCart) {
    if unsafe { (*cart).dispatching } {
        return;
    }
    unsafe { (*cart).dispatching = true };

    loop {
        let Some(event) = unsafe { &*cart }.pending.borrow_mut().pop_front() else {
            break;
        };
        let observers = unsafe { &*cart }.observers.clone();
        for observer in observers {
            if unsafe { &*cart }.is_subscribed(observer.id) {
                (observer.callback)(event, observer.user_data);
            }
        }
    }

    unsafe { (*cart).dispatching = false };
}

/// Add one unit of `product` (copied). Returns false on null arguments.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_add(cart: *mut FfiCart, product: *const FfiProduct) -> bool {
    if product.is_null() {
        return false;
    }
    mutate_cart(cart, false, |cart| {
        let product = unsafe { &*product }.to_core();
        cart.add_to_cart(&product);
        true
    })
}

/// Remove the line for `product_id`. Returns whether a line was removed.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_remove(cart: *mut FfiCart, product_id: u32) -> bool {
    mutate_cart(cart, false, |cart| cart.remove_from_cart(product_id))
}

/// Set a line's quantity. `quantity` must be at least 1: zero is rejected
/// (returns false, cart untouched); use `storefront_cart_change_quantity` or
/// `storefront_cart_remove` for removals.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_update_quantity(
    cart: *mut FfiCart,
    product_id: u32,
    quantity: u32,
) -> bool {
    let Some(quantity) = NonZeroU32::new(quantity) else {
        return false;
    };
    mutate_cart(cart, false, |cart| cart.update_quantity(product_id, quantity))
}

/// Apply a stepper value: below 1 removes the line, otherwise updates it.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_change_quantity(
    cart: *mut FfiCart,
    product_id: u32,
    quantity: i64,
) -> bool {
    mutate_cart(cart, false, |cart| cart.change_quantity(product_id, quantity))
}

/// Empty the cart.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_clear(cart: *mut FfiCart) {
    mutate_cart(cart, (), Cart::clear_cart)
}

#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_total_items(cart: *mut FfiCart) -> u64 {
    with_cart(cart, 0, |cart| cart.total_items())
}

#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_total_price(cart: *mut FfiCart) -> f64 {
    with_cart(cart, 0.0, |cart| cart.total_price())
}

/// Number of distinct lines.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_len(cart: *mut FfiCart) -> u32 {
    with_cart(cart, 0, |cart| u32::try_from(cart.len()).unwrap_or(u32::MAX))
}

/// Snapshot of the cart lines in display order. Free with
/// `storefront_free_cart_items`. Returns null if `cart` is null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_items(cart: *mut FfiCart) -> *mut FfiCartItemList {
    with_cart(cart, std::ptr::null_mut(), |cart| {
        let (items, len) = into_raw_parts(cart.items().iter().map(FfiCartItem::from_core).collect());
        Box::into_raw(Box::new(FfiCartItemList { items, len }))
    })
}

/// Totals for the cart page. A null cart yields an all-zero summary.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_summary(cart: *mut FfiCart) -> FfiOrderSummary {
    let empty: FfiOrderSummary = OrderSummary::from_totals(0, 0.0).into();
    with_cart(cart, empty, |cart| OrderSummary::for_cart(cart).into())
}

/// Register `observer` to be called with `user_data` after every cart
/// mutation. Returns the subscription id, or 0 on a null cart.
///
/// The callback runs after the mutation has completed. It may read or mutate
/// the cart and subscribe or unsubscribe, but must not free it. Events raised
/// from inside a callback are delivered after the current one, in order.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_subscribe(
    cart: *mut FfiCart,
    observer: FfiCartObserver,
    user_data: *mut c_void,
) -> u64 {
    if cart.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| {
        unsafe { &mut *cart }.add_observer(observer, user_data)
    }))
    .unwrap_or(0)
}

/// Drop a subscription. Returns whether it existed.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_cart_unsubscribe(cart: *mut FfiCart, subscription: u64) -> bool {
    if cart.is_null() {
        return false;
    }
    catch_unwind(AssertUnwindSafe(|| {
        unsafe { &mut *cart }.remove_observer(subscription)
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Format `amount` as US dollars. Free with `storefront_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_format_price(amount: f64) -> *mut c_char {
    catch_unwind(|| c_string(format_price(amount))).unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `storefront_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        for h in unsafe { from_raw_parts(req.headers, req.headers_len) } {
            if !h.key.is_null() {
                drop(unsafe { CString::from_raw(h.key) });
            }
            if !h.value.is_null() {
                drop(unsafe { CString::from_raw(h.value) });
            }
        }
    });
}

/// Free an `FfiCatalogResult` returned by any `storefront_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_free_result(result: *mut FfiCatalogResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Product => {
                let product = unsafe { Box::from_raw(result.data as *mut FfiProduct) };
                product.free_fields();
            }
            FfiDataTag::ProductList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiProductList) };
                for product in unsafe { from_raw_parts(list.items, list.len) } {
                    product.free_fields();
                }
            }
            FfiDataTag::CategoryList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiStringList) };
                for name in unsafe { from_raw_parts(list.items, list.len) } {
                    if !name.is_null() {
                        drop(unsafe { CString::from_raw(name) });
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a list returned by `storefront_cart_items`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_free_cart_items(list: *mut FfiCartItemList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        for item in unsafe { from_raw_parts(list.items, list.len) } {
            item.product.free_fields();
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn storefront_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
