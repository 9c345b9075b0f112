//! HTTP-level integration tests for the `/adjustments` endpoints.
//!
//! Every stock-changing request is followed by a read of the product to
//! confirm where its stock landed.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_product(pool: &PgPool, sku: &str, price: f64, stock: i32) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/products",
        json!({"title": format!("Product {sku}"), "sku": sku, "price": price, "stock": stock}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_adjustment(pool: &PgPool, sku: &str, qty: i32) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/adjustments", json!({"sku": sku, "qty": qty})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn product_stock(pool: &PgPool, id: i64) -> i64 {
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/products/{id}")).await).await;
    json["stock"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Stock reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_update_delete_reconciles_stock(pool: PgPool) {
    let product_id = create_product(&pool, "SKU-LIFE", 1.0, 100).await;

    let created = create_adjustment(&pool, "SKU-LIFE", 10).await;
    assert_eq!(created["message"], "Adjustment created successfully.");
    assert_eq!(created["stock"], 110);
    assert_eq!(product_stock(&pool, product_id).await, 110);
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/adjustments", json!({"id": id, "qty": 15})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Adjustment updated successfully.");
    assert_eq!(json["stock"], 115);
    assert_eq!(product_stock(&pool, product_id).await, 115);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/adjustments/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Adjustment soft-deleted successfully.");
    assert_eq!(json["stock"], 100);
    assert_eq!(product_stock(&pool, product_id).await, 100);

    let app = common::build_test_app(pool);
    assert_eq!(
        get(app, &format!("/adjustments/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_adjustment_driving_stock_negative_returns_400(pool: PgPool) {
    let product_id = create_product(&pool, "SKU-LOW", 1.0, 5).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/adjustments", json!({"sku": "SKU-LOW", "qty": -10})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_OPERATION");
    assert_eq!(
        json["details"],
        "Stock cannot be negative (current stock 5, change -10)"
    );

    assert_eq!(product_stock(&pool, product_id).await, 5);
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/adjustments").await).await;
    assert_eq!(json["totalItems"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_driving_stock_negative_returns_400(pool: PgPool) {
    let product_id = create_product(&pool, "SKU-UPD", 1.0, 5).await;
    let id = create_adjustment(&pool, "SKU-UPD", -5).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/adjustments", json!({"id": id, "qty": -6})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(product_stock(&pool, product_id).await, 0);
}

// ---------------------------------------------------------------------------
// Validation and lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_without_sku_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/adjustments", json!({"qty": 3})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"], "sku is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_without_qty_returns_400(pool: PgPool) {
    create_product(&pool, "SKU-QTY", 1.0, 5).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/adjustments", json!({"sku": "SKU-QTY"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Bad request.");
    assert!(json["details"].as_str().unwrap().contains("qty"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_for_unknown_sku_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/adjustments", json!({"sku": "NOPE", "qty": 3})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["details"],
        "No product found with sku: NOPE"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_adjustment_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/adjustments", json!({"id": 999999, "qty": 1})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Adjustment not found.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_adjustment_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = delete(app, "/adjustments/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_carries_product_and_amount(pool: PgPool) {
    let product_id = create_product(&pool, "SKU-AMT", 2.5, 0).await;
    let id = create_adjustment(&pool, "SKU-AMT", 4).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/adjustments/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["product_id"], product_id);
    assert_eq!(json["sku"], "SKU-AMT");
    assert_eq!(json["qty"], 4);
    assert_eq!(json["amount"], 10.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_defaults_to_ten_per_page(pool: PgPool) {
    create_product(&pool, "SKU-MANY", 1.0, 0).await;
    for _ in 0..12 {
        create_adjustment(&pool, "SKU-MANY", 1).await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/adjustments").await).await;
    assert_eq!(json["totalItems"], 12);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["adjustments"].as_array().unwrap().len(), 10);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/adjustments?page=2").await).await;
    assert_eq!(json["adjustments"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/adjustments?limit=0").await).await;
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["adjustments"].as_array().unwrap().len(), 12);
}

// ---------------------------------------------------------------------------
// Product deletion cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_product_hides_its_adjustments(pool: PgPool) {
    let product_id = create_product(&pool, "SKU-CASC", 1.0, 10).await;
    let id = create_adjustment(&pool, "SKU-CASC", 2).await["id"].as_i64().unwrap();
    create_product(&pool, "SKU-KEEP", 1.0, 10).await;
    create_adjustment(&pool, "SKU-KEEP", 1).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/products/{product_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    assert_eq!(
        get(app, &format!("/adjustments/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/adjustments").await).await;
    assert_eq!(json["totalItems"], 1);
    assert_eq!(json["adjustments"][0]["sku"], "SKU-KEEP");

    let app = common::build_test_app(pool);
    let response = post_json(app, "/adjustments", json!({"sku": "SKU-CASC", "qty": 1})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_renamed_product_keeps_its_adjustments(pool: PgPool) {
    let product_id = create_product(&pool, "OLD", 1.0, 10).await;
    let id = create_adjustment(&pool, "OLD", 5).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/products", json!({"id": product_id, "sku": "NEW"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/adjustments/{id}")).await).await;
    assert_eq!(json["sku"], "NEW");
    assert_eq!(json["product_id"], product_id);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/adjustments/{id}")).await;
    assert_eq!(body_json(response).await["stock"], 10);
    assert_eq!(product_stock(&pool, product_id).await, 10);
}
