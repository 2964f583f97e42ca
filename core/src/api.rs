//! Stateless HTTP request builder and response parser for the product API.
//!
//! # Design
//! `ProductApi` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip, so
//! the codec stays deterministic and free of I/O dependencies.
//!
//! Any 2xx counts as success: the server may answer a create with 200 or
//! 201 and a delete with 200 or 204.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewProduct, Product, ProductId};

const JSON_HEADER: (&str, &str) = ("content-type", "application/json");

#[derive(Debug, Clone)]
pub struct ProductApi {
    base_url: String,
}

impl ProductApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_products(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/products", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_product(&self, input: &NewProduct) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(json_request(HttpMethod::Post, format!("{}/products", self.base_url), body))
    }

    /// The full record is sent; the server replaces every field.
    pub fn build_update_product(&self, product: &Product) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(product).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(json_request(
            HttpMethod::Put,
            format!("{}/products/{}", self.base_url, product.id),
            body,
        ))
    }

    pub fn build_delete_product(&self, id: ProductId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/products/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Only the status matters; the body is whatever the server echoes back.
    pub fn parse_update_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_request(method: HttpMethod, path: String, body: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: vec![(JSON_HEADER.0.to_string(), JSON_HEADER.1.to_string())],
        body: Some(body),
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn api() -> ProductApi {
        ProductApi::new("http://localhost:3000")
    }

    fn cafe() -> Product {
        Product {
            id: 7,
            name: "Café".to_string(),
            unit_price: Decimal::from(12000),
            stock: 5,
        }
    }

    #[test]
    fn build_list_products_produces_correct_request() {
        let req = api().build_list_products();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/products");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_product_sends_draft_without_id() {
        let input = NewProduct {
            name: "Café".to_string(),
            unit_price: Decimal::from(12000),
            stock: 5,
        };
        let req = api().build_create_product(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/products");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["nombre"], "Café");
        assert_eq!(body["precio_unitario"].as_f64(), Some(12000.0));
        assert_eq!(body["stock"], 5);
        assert!(body.get("id_producto").is_none());
    }

    #[test]
    fn build_update_product_sends_full_record_keyed_by_id() {
        let req = api().build_update_product(&cafe()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/products/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id_producto"], 7);
        assert_eq!(body["nombre"], "Café");
    }

    #[test]
    fn build_delete_product_produces_correct_request() {
        let req = api().build_delete_product(3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/products/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_products_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id_producto":7,"nombre":"Café","precio_unitario":12000,"stock":5}]"#,
        );
        let products = api().parse_list_products(response).unwrap();
        assert_eq!(products, vec![cafe()]);
    }

    #[test]
    fn parse_create_product_accepts_200_and_201() {
        let body = r#"{"id_producto":7,"nombre":"Café","precio_unitario":12000,"stock":5}"#;
        assert_eq!(api().parse_create_product(HttpResponse::new(201, body)).unwrap(), cafe());
        assert_eq!(api().parse_create_product(HttpResponse::new(200, body)).unwrap(), cafe());
    }

    #[test]
    fn parse_create_product_wrong_status() {
        let err = api()
            .parse_create_product(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_product_ignores_body() {
        assert!(api().parse_update_product(HttpResponse::new(200, "whatever")).is_ok());
        let err = api().parse_update_product(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_product_success_and_not_found() {
        assert!(api().parse_delete_product(HttpResponse::new(204, "")).is_ok());
        assert!(api().parse_delete_product(HttpResponse::new(200, "")).is_ok());
        let err = api().parse_delete_product(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let api = ProductApi::new("http://localhost:3000/");
        assert_eq!(api.build_list_products().path, "http://localhost:3000/products");
    }

    #[test]
    fn parse_list_products_bad_json() {
        let err = api()
            .parse_list_products(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
