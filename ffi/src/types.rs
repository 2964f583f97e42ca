//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, `f64`
//! instead of `Decimal`, and tagged enums with explicit discriminants.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use retail_core::error::ApiError;
use retail_core::http::HttpMethod;
use retail_core::Product;
use rust_decimal::prelude::ToPrimitive;

/// Opaque handle to a `ProductApi`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiProductApi {
    pub(crate) inner: retail_core::ProductApi,
}

/// Heap C string; interior NUL bytes are dropped rather than failing.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let cleaned = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(cleaned).unwrap_or_default().into_raw()
}

/// Move `items` to the heap and leak it as a raw pointer + length.
fn leak_vec<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len() as u32;
    (Box::into_raw(boxed) as *mut T, len)
}

/// Take back ownership of memory handed out by `leak_vec`.
///
/// # Safety
/// `ptr` and `len` must come from a single `leak_vec` call and not have been
/// reclaimed before.
pub(crate) unsafe fn reclaim_vec<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
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
/// Built by `retail_build_*` functions. The C caller executes the request
/// and passes the response back through `retail_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: retail_core::HttpRequest) -> *mut Self {
        let body = req.body.map(c_string).unwrap_or(std::ptr::null_mut());
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = leak_vec(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request and
/// passes a pointer to a `retail_parse_*` function. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiRetailResult`.
#[repr(C)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Transport = 5,
    Panic = 6,
    NullArg = 7,
}

/// Tag that tells `retail_free_result` what `FfiRetailResult::data` points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    Product = 1,
    ProductList = 2,
}

/// A product exposed to C. Prices cross as `f64`.
#[repr(C)]
pub struct FfiProduct {
    pub id: i64,
    pub name: *mut c_char,
    pub unit_price: f64,
    pub stock: u32,
}

impl FfiProduct {
    fn from_core(product: Product) -> Self {
        FfiProduct {
            id: product.id,
            unit_price: product.unit_price.to_f64().unwrap_or_default(),
            stock: product.stock,
            name: c_string(product.name),
        }
    }
}

/// A list of products exposed to C.
#[repr(C)]
pub struct FfiProductList {
    pub items: *mut FfiProduct,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiRetailResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiRetailResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        FfiRetailResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }
        .boxed()
    }

    fn failure(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        FfiRetailResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    pub(crate) fn ok_product(product: Product) -> *mut Self {
        let ffi_product = Box::new(FfiProduct::from_core(product));
        Self::ok(FfiDataTag::Product, Box::into_raw(ffi_product) as *mut std::ffi::c_void)
    }

    pub(crate) fn ok_product_list(products: Vec<Product>) -> *mut Self {
        let items: Vec<FfiProduct> = products.into_iter().map(FfiProduct::from_core).collect();
        let (items, len) = leak_vec(items);
        let list = Box::new(FfiProductList { items, len });
        Self::ok(FfiDataTag::ProductList, Box::into_raw(list) as *mut std::ffi::c_void)
    }

    /// Success with no data payload (update, delete).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let msg = err.to_string();
        match err {
            ApiError::NotFound => Self::failure(FfiErrorCode::NotFound, 404, msg),
            ApiError::HttpError { status, .. } => Self::failure(FfiErrorCode::Http, status, msg),
            ApiError::DeserializationError(_) => Self::failure(FfiErrorCode::Deserialization, 0, msg),
            ApiError::SerializationError(_) => Self::failure(FfiErrorCode::Serialization, 0, msg),
            ApiError::Transport(_) => Self::failure(FfiErrorCode::Transport, 0, msg),
        }
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
