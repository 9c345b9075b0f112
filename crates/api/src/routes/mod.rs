pub mod adjustment;
pub mod health;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Build the resource route tree.
///
/// Route hierarchy:
///
/// ```text
/// /products                 list (GET), create or update (POST)
/// /products/{id}            get, soft-delete
///
/// /adjustments              list (GET), create or update (POST)
/// /adjustments/{id}         get, soft-delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product::router())
        .nest("/adjustments", adjustment::router())
}
