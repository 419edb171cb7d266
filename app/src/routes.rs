use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price: u32,
}

pub const PRODUCTS: [Product; 3] = [
    Product {
        id: 1,
        name: "Product 1",
        price: 100,
    },
    Product {
        id: 2,
        name: "Product 2",
        price: 200,
    },
    Product {
        id: 3,
        name: "Product 3",
        price: 300,
    },
];

/// Every response body is wrapped as `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(Envelope { data: "OK" }))
}

pub async fn products_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(Envelope { data: PRODUCTS }))
}
