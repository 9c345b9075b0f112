#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use stockroom_api::config::ServerConfig;
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_core::catalog::{CatalogProduct, CatalogSource, StaticCatalog};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        catalog_url: "http://localhost:1/products".to_string(),
        catalog_seed_enabled: true,
    }
}

/// Build the full application router with an empty in-memory catalog.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_catalog(pool, StaticCatalog::default())
}

/// Build the full application router seeding from `catalog`.
pub fn build_test_app_with_catalog(pool: PgPool, catalog: impl CatalogSource + 'static) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(catalog))
}

pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    catalog: Arc<dyn CatalogSource>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        catalog,
    };
    build_app_router(state, &config)
}

pub fn catalog_product(sku: &str, price: f64) -> CatalogProduct {
    CatalogProduct {
        title: format!("Catalog {sku}"),
        sku: sku.to_string(),
        image: Some(format!("https://cdn.example/{sku}.png")),
        price,
        description: Some("From the catalog".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty(), false).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, Body::empty(), false).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Body::from(body.to_string()), true).await
}

async fn send(app: Router, method: Method, uri: &str, body: Body, json: bool) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if json {
        builder = builder.header("content-type", "application/json");
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
