//! C-ABI wrapper around the `retail-core` product API codec.
//!
//! # Overview
//! Lets a native mobile shell build product API requests and parse their
//! responses through `extern "C"` functions, without linking Rust's async
//! runtime or serde directly. The shell owns the HTTP stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1. Builders
//!   run the same local validation as `ProductCatalog` and return null when
//!   it fails.
//! - A single `FfiRetailResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `retail_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use retail_core::http::HttpResponse;
use retail_core::{Product, ProductDraft};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use types::*;

/// Borrow a C string as UTF-8. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `s` must be non-null and point to a NUL-terminated string.
unsafe fn read_str<'a>(s: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Handle lifecycle
// ---------------------------------------------------------------------------

/// Create a new `ProductApi` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `retail_api_free`.
#[unsafe(no_mangle)]
pub extern "C" fn retail_api_new(base_url: *const c_char) -> *mut FfiProductApi {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_str(base_url) };
        let api = retail_core::ProductApi::new(url);
        Box::into_raw(Box::new(FfiProductApi { inner: api }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a handle created by `retail_api_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn retail_api_free(api: *mut FfiProductApi) {
    if !api.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(api) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build `GET /products`.
///
/// Returns null if `api` is null.
/// The caller must free the returned pointer with `retail_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn retail_build_list_products(api: *const FfiProductApi) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if api.is_null() {
            return std::ptr::null_mut();
        }
        let api = unsafe { &*api };
        FfiHttpRequest::from_core(api.inner.build_list_products())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `POST /products`.
///
/// Returns null if `api` or `name` is null, if the name is blank, or if the
/// price is negative or not a finite number.
#[unsafe(no_mangle)]
pub extern "C" fn retail_build_create_product(
    api: *const FfiProductApi,
    name: *const c_char,
    unit_price: f64,
    stock: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if api.is_null() || name.is_null() {
            return std::ptr::null_mut();
        }
        let api = unsafe { &*api };
        let draft = ProductDraft {
            name: unsafe { read_str(name) }.to_string(),
            unit_price: Decimal::from_f64(unit_price),
            stock,
        };
        let Ok(input) = draft.validate() else {
            return std::ptr::null_mut();
        };
        match api.inner.build_create_product(&input) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `PUT /products/{id}` carrying the full record.
///
/// Returns null if `api` or `name` is null, if the name is blank, or if the
/// price is not strictly positive.
#[unsafe(no_mangle)]
pub extern "C" fn retail_build_update_product(
    api: *const FfiProductApi,
    id: i64,
    name: *const c_char,
    unit_price: f64,
    stock: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if api.is_null() || name.is_null() {
            return std::ptr::null_mut();
        }
        let api = unsafe { &*api };
        let Some(unit_price) = Decimal::from_f64(unit_price) else {
            return std::ptr::null_mut();
        };
        let product = Product {
            id,
            name: unsafe { read_str(name) }.to_string(),
            unit_price,
            stock,
        };
        if product.validate_edit().is_err() {
            return std::ptr::null_mut();
        }
        match api.inner.build_update_product(&product) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `DELETE /products/{id}`.
///
/// Returns null if `api` is null.
#[unsafe(no_mangle)]
pub extern "C" fn retail_build_delete_product(api: *const FfiProductApi, id: i64) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if api.is_null() {
            return std::ptr::null_mut();
        }
        let api = unsafe { &*api };
        FfiHttpRequest::from_core(api.inner.build_delete_product(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { read_str(resp.body) }.to_string()
    };
    HttpResponse::new(resp.status, body)
}

/// Shared null checks and conversion for every `retail_parse_*` function.
fn parse_with(
    api: *const FfiProductApi,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&retail_core::ProductApi, HttpResponse) -> *mut FfiRetailResult,
) -> *mut FfiRetailResult {
    if api.is_null() {
        return FfiRetailResult::null_arg("api");
    }
    if response.is_null() {
        return FfiRetailResult::null_arg("response");
    }
    let api = unsafe { &*api };
    let resp = unsafe { &*response };
    parse(&api.inner, ffi_response_to_core(resp))
}

/// Parse the response to `GET /products`.
///
/// Returns a result with `data_tag = ProductList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn retail_parse_list_products(
    api: *const FfiProductApi,
    response: *const FfiHttpResponse,
) -> *mut FfiRetailResult {
    catch_unwind(|| {
        parse_with(api, response, |api, resp| match api.parse_list_products(resp) {
            Ok(products) => FfiRetailResult::ok_product_list(products),
            Err(e) => FfiRetailResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiRetailResult::panic("panic in retail_parse_list_products"))
}

/// Parse the response to `POST /products`.
///
/// Returns a result with `data_tag = Product` on success.
#[unsafe(no_mangle)]
pub extern "C" fn retail_parse_create_product(
    api: *const FfiProductApi,
    response: *const FfiHttpResponse,
) -> *mut FfiRetailResult {
    catch_unwind(|| {
        parse_with(api, response, |api, resp| match api.parse_create_product(resp) {
            Ok(product) => FfiRetailResult::ok_product(product),
            Err(e) => FfiRetailResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiRetailResult::panic("panic in retail_parse_create_product"))
}

/// Parse the response to `PUT /products/{id}`.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn retail_parse_update_product(
    api: *const FfiProductApi,
    response: *const FfiHttpResponse,
) -> *mut FfiRetailResult {
    catch_unwind(|| {
        parse_with(api, response, |api, resp| match api.parse_update_product(resp) {
            Ok(()) => FfiRetailResult::ok_empty(),
            Err(e) => FfiRetailResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiRetailResult::panic("panic in retail_parse_update_product"))
}

/// Parse the response to `DELETE /products/{id}`.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn retail_parse_delete_product(
    api: *const FfiProductApi,
    response: *const FfiHttpResponse,
) -> *mut FfiRetailResult {
    catch_unwind(|| {
        parse_with(api, response, |api, resp| match api.parse_delete_product(resp) {
            Ok(()) => FfiRetailResult::ok_empty(),
            Err(e) => FfiRetailResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiRetailResult::panic("panic in retail_parse_delete_product"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `retail_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn retail_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        for h in unsafe { reclaim_vec(req.headers, req.headers_len) } {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    });
}

/// Free an `FfiRetailResult` returned by any `retail_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn retail_free_result(result: *mut FfiRetailResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Product => {
                let product = unsafe { Box::from_raw(result.data as *mut FfiProduct) };
                free_c_string(product.name);
            }
            FfiDataTag::ProductList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiProductList) };
                for item in unsafe { reclaim_vec(list.items, list.len) } {
                    free_c_string(item.name);
                }
            }
            FfiDataTag::None => {}
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
