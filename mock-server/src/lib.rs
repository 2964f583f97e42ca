use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "id_producto")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    pub stock: i64,
}

#[derive(Deserialize)]
pub struct CreateProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    #[serde(default)]
    pub stock: i64,
}

/// PUT carries the full record; the id in the path wins over the body.
#[derive(Deserialize)]
pub struct ReplaceProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    pub stock: i64,
}

/// Products keyed by id so listing comes back in creation order.
#[derive(Default)]
pub struct Store {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

impl Store {
    fn insert(&mut self, name: String, unit_price: f64, stock: i64) -> Product {
        self.next_id += 1;
        let product = Product {
            id: self.next_id,
            name,
            unit_price,
            stock,
        };
        self.products.insert(product.id, product.clone());
        product
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_products(Vec::new())
}

/// Router pre-loaded with `seed`. New ids continue after the largest seed id.
pub fn app_with_products(seed: Vec<Product>) -> Router {
    let mut store = Store::default();
    for product in seed {
        store.next_id = store.next_id.max(product.id);
        store.products.insert(product.id, product);
    }
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(State(db): State<Db>) -> Json<Vec<Product>> {
    let store = db.read().await;
    Json(store.products.values().cloned().collect())
}

async fn create_product(
    State(db): State<Db>,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    if input.name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let product = db.write().await.insert(input.name, input.unit_price, input.stock);
    info!(id = product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ReplaceProduct>,
) -> Result<Json<Product>, StatusCode> {
    let mut store = db.write().await;
    let product = store.products.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    product.name = input.name;
    product.unit_price = input.unit_price;
    product.stock = input.stock;
    info!(id, "product updated");
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let removed = store.products.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    info!(id = removed.id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
