use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_products, Product};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn seed() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Café 500g".to_string(),
            unit_price: 12000.0,
            stock: 10,
        },
        Product {
            id: 3,
            name: "Aceite 1L".to_string(),
            unit_price: 9800.0,
            stock: 7,
        },
    ]
}

// --- list ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app().oneshot(empty_request("GET", "/products")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn list_products_seeded_in_id_order() {
    let resp = app_with_products(seed())
        .oneshot(empty_request("GET", "/products"))
        .await
        .unwrap();

    let products: Vec<Product> = body_json(resp).await;
    assert_eq!(products, seed());
}

// --- create ---

#[tokio::test]
async fn create_product_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"nombre":"Café","precio_unitario":12000,"stock":5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Product = body_json(resp).await;
    assert_eq!(product.id, 1);
    assert_eq!(product.name, "Café");
    assert_eq!(product.unit_price, 12000.0);
    assert_eq!(product.stock, 5);
}

#[tokio::test]
async fn create_product_continues_after_seed_ids() {
    let resp = app_with_products(seed())
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"nombre":"Sal","precio_unitario":1500}"#,
        ))
        .await
        .unwrap();

    let product: Product = body_json(resp).await;
    assert_eq!(product.id, 4);
}

#[tokio::test]
async fn create_product_blank_name_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"nombre":"  ","precio_unitario":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_product_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/products", r#"{"not_nombre":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- update ---

#[tokio::test]
async fn update_product_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/products/42",
            r#"{"id_producto":42,"nombre":"Nope","precio_unitario":1,"stock":0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_product_uses_path_id() {
    let resp = app_with_products(seed())
        .oneshot(json_request(
            "PUT",
            "/products/3",
            r#"{"id_producto":99,"nombre":"Aceite de oliva 1L","precio_unitario":21000,"stock":2}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let product: Product = body_json(resp).await;
    assert_eq!(product.id, 3);
    assert_eq!(product.name, "Aceite de oliva 1L");
    assert_eq!(product.stock, 2);
}

// --- delete ---

#[tokio::test]
async fn delete_product_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/products/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_product_bad_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/products/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_product_is_not_readable_by_id() {
    let resp = app_with_products(seed())
        .oneshot(empty_request("GET", "/products/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/products",
            r#"{"nombre":"Arroz 5kg","precio_unitario":18000,"stock":3}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Product = body_json(resp).await;
    let id = created.id;

    // list: should contain the one product
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/products"))
        .await
        .unwrap();
    let products: Vec<Product> = body_json(resp).await;
    assert_eq!(products, vec![created.clone()]);

    // update: full replacement
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/products/{id}"),
            &format!(r#"{{"id_producto":{id},"nombre":"Arroz 5kg","precio_unitario":17500,"stock":1}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Product = body_json(resp).await;
    assert_eq!(updated.unit_price, 17500.0);
    assert_eq!(updated.stock, 1);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/products/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // delete again: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/products/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/products"))
        .await
        .unwrap();
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}
