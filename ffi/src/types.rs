//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::rc::Rc;

use storefront_core::{
    ApiError, Cart, CartEvent, CartItem, HttpMethod, OrderSummary, Product, Rating,
};

/// Opaque handle to a `CatalogClient`.
pub struct FfiCatalogClient {
    pub(crate) inner: storefront_core::CatalogClient,
}

/// Opaque handle to a session `Cart`.
///
/// C observers are kept here rather than inside `inner`: the core cart only
/// queues events into `pending`, and `storefront_*` entry points deliver them
/// once no borrow of the cart is alive, so a callback may call back into the
/// cart.
pub struct FfiCart {
    pub(crate) inner: Cart,
    pub(crate) observers: Vec<CObserver>,
    pub(crate) pending: Rc<RefCell<VecDeque<FfiCartEvent>>>,
    pub(crate) next_observer: u64,
    pub(crate) dispatching: bool,
}

/// A registered C callback. Ids start at 1; 0 is the failure sentinel.
#[derive(Clone, Copy)]
pub(crate) struct CObserver {
    pub(crate) id: u64,
    pub(crate) callback: FfiCartObserver,
    pub(crate) user_data: *mut c_void,
}

impl FfiCart {
    pub(crate) fn new() -> Self {
        let pending = Rc::new(RefCell::new(VecDeque::new()));
        let mut inner = Cart::new();
        let queue = Rc::clone(&pending);
        inner.subscribe(move |event, _items| queue.borrow_mut().push_back((*event).into()));
        Self {
            inner,
            observers: Vec::new(),
            pending,
            next_observer: 1,
            dispatching: false,
        }
    }

    pub(crate) fn add_observer(&mut self, callback: FfiCartObserver, user_data: *mut c_void) -> u64 {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push(CObserver {
            id,
            callback,
            user_data,
        });
        id
    }

    pub(crate) fn remove_observer(&mut self, id: u64) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() < before
    }

    pub(crate) fn is_subscribed(&self, id: u64) -> bool {
        self.observers.iter().any(|o| o.id == id)
    }
}

/// Move `s` onto the C heap. Interior NULs yield an empty string.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Borrow a C string as UTF-8, empty if invalid. `ptr` must be non-null.
pub(crate) unsafe fn str_from_ptr<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

/// Hand a vector's buffer to C. Empty vectors become null; anything past
/// `u32::MAX` entries is dropped so `len` always matches the buffer.
pub(crate) fn into_raw_parts<T>(mut items: Vec<T>) -> (*mut T, u32) {
    let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
    items.truncate(len as usize);
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let mut boxed = items.into_boxed_slice();
    let ptr = boxed.as_mut_ptr();
    std::mem::forget(boxed);
    (ptr, len)
}

/// Take back a buffer produced by `into_raw_parts`.
pub(crate) unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `storefront_build_*` functions. The C caller executes the
/// request and passes the response back through `storefront_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: storefront_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body: req.body.map_or(std::ptr::null_mut(), c_string),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request and
/// passes a pointer to a `storefront_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Catalog payloads
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Clone, Copy)]
pub struct FfiRating {
    pub rate: f64,
    pub count: u32,
}

/// A catalog product exposed to C.
#[repr(C)]
pub struct FfiProduct {
    pub id: u32,
    pub title: *mut c_char,
    pub price: f64,
    pub description: *mut c_char,
    pub category: *mut c_char,
    pub image: *mut c_char,
    pub rating: FfiRating,
}

impl FfiProduct {
    pub(crate) fn from_core(p: Product) -> Self {
        FfiProduct {
            id: p.id,
            title: c_string(p.title),
            price: p.price,
            description: c_string(p.description),
            category: c_string(p.category),
            image: c_string(p.image),
            rating: FfiRating {
                rate: p.rating.rate,
                count: p.rating.count,
            },
        }
    }

    /// Copy back into a core `Product`. Null strings read as empty.
    pub(crate) fn to_core(&self) -> Product {
        let text = |ptr: *mut c_char| {
            if ptr.is_null() {
                String::new()
            } else {
                unsafe { str_from_ptr(ptr) }.to_string()
            }
        };
        Product {
            id: self.id,
            title: text(self.title),
            price: self.price,
            description: text(self.description),
            category: text(self.category),
            image: text(self.image),
            rating: Rating {
                rate: self.rating.rate,
                count: self.rating.count,
            },
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        for ptr in [self.title, self.description, self.category, self.image] {
            if !ptr.is_null() {
                drop(unsafe { CString::from_raw(ptr) });
            }
        }
    }
}

#[repr(C)]
pub struct FfiProductList {
    pub items: *mut FfiProduct,
    pub len: u32,
}

#[repr(C)]
pub struct FfiStringList {
    pub items: *mut *mut c_char,
    pub len: u32,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiCatalogResult`.
#[repr(C)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    Http = 2,
    Decode = 3,
    Panic = 4,
    NullArg = 5,
}

/// Tag that tells `storefront_free_result` what `FfiCatalogResult::data`
/// points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    Product = 1,
    ProductList = 2,
    CategoryList = 3,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiCatalogResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiCatalogResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiCatalogResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiCatalogResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a single `FfiProduct`.
    pub(crate) fn ok_product(product: Product) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiProduct::from_core(product)));
        Self::ok(FfiDataTag::Product, data as *mut c_void)
    }

    /// Build a success result carrying a `FfiProductList`.
    pub(crate) fn ok_product_list(products: Vec<Product>) -> *mut Self {
        let (items, len) = into_raw_parts(products.into_iter().map(FfiProduct::from_core).collect());
        let data = Box::into_raw(Box::new(FfiProductList { items, len }));
        Self::ok(FfiDataTag::ProductList, data as *mut c_void)
    }

    /// Build a success result carrying a `FfiStringList` of categories.
    pub(crate) fn ok_category_list(categories: Vec<String>) -> *mut Self {
        let (items, len) = into_raw_parts(categories.into_iter().map(c_string).collect());
        let data = Box::into_raw(Box::new(FfiStringList { items, len }));
        Self::ok(FfiDataTag::CategoryList, data as *mut c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (code, status) = match &err {
            ApiError::Network(_) => (FfiErrorCode::Network, 0),
            ApiError::Status { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Decode(_) => (FfiErrorCode::Decode, 0),
        };
        Self::err(code, status, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}

// ---------------------------------------------------------------------------
// Cart types
// ---------------------------------------------------------------------------

/// A cart line exposed to C.
#[repr(C)]
pub struct FfiCartItem {
    pub product: FfiProduct,
    pub quantity: u32,
    pub subtotal: f64,
}

impl FfiCartItem {
    pub(crate) fn from_core(item: &CartItem) -> Self {
        FfiCartItem {
            product: FfiProduct::from_core(item.product.clone()),
            quantity: item.quantity.get(),
            subtotal: item.subtotal(),
        }
    }
}

#[repr(C)]
pub struct FfiCartItemList {
    pub items: *mut FfiCartItem,
    pub len: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfiCartEventKind {
    Added = 0,
    Removed = 1,
    QuantityUpdated = 2,
    Cleared = 3,
}

/// Cart mutation delivered to C observers. `product_id` and `quantity` are
/// 0 where the event carries none.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FfiCartEvent {
    pub kind: FfiCartEventKind,
    pub product_id: u32,
    pub quantity: u32,
}

impl From<CartEvent> for FfiCartEvent {
    fn from(event: CartEvent) -> Self {
        let (kind, product_id, quantity) = match event {
            CartEvent::Added { product_id, quantity } => (FfiCartEventKind::Added, product_id, quantity),
            CartEvent::Removed { product_id } => (FfiCartEventKind::Removed, product_id, 0),
            CartEvent::QuantityUpdated { product_id, quantity } => {
                (FfiCartEventKind::QuantityUpdated, product_id, quantity)
            }
            CartEvent::Cleared => (FfiCartEventKind::Cleared, 0, 0),
        };
        FfiCartEvent {
            kind,
            product_id,
            quantity,
        }
    }
}

/// C observer callback. `user_data` is passed back untouched.
pub type FfiCartObserver = extern "C" fn(event: FfiCartEvent, user_data: *mut c_void);

/// Cart page totals, returned by value.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FfiOrderSummary {
    pub total_items: u64,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
    pub ships_free: bool,
    /// Meaningful only while `ships_free` is false.
    pub free_shipping_remaining: f64,
}

impl From<OrderSummary> for FfiOrderSummary {
    fn from(s: OrderSummary) -> Self {
        FfiOrderSummary {
            total_items: s.total_items,
            subtotal: s.subtotal,
            shipping: s.shipping,
            total: s.total,
            ships_free: s.ships_free(),
            free_shipping_remaining: s.free_shipping_remaining.unwrap_or(0.0),
        }
    }
}
