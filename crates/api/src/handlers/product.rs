//! Handlers for the `/products` resource.
//!
//! Listing a store that has never held a product triggers the first-run
//! catalog seed. Writes go
//! through [`StockLedger`] so sku renames and deletes stay consistent with
//! the adjustment history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::pagination::DEFAULT_PRODUCT_LIMIT;
use stockroom_core::types::DbId;
use stockroom_db::ledger::StockLedger;
use stockroom_db::models::product::UpsertProduct;
use stockroom_db::repositories::ProductRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::query::PageParams;
use crate::response::{MessageResponse, ProductPage};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /products?page=1&limit=0
///
/// List active products, newest first. `limit=0` (the default) returns
/// every product on one page.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.resolve(DEFAULT_PRODUCT_LIMIT);

    if state.config.catalog_seed_enabled && ProductRepo::count_all(&state.pool).await? == 0 {
        seed_from_catalog(&state).await?;
    }

    let total_items = ProductRepo::count_active(&state.pool).await?;

    let products = ProductRepo::list(&state.pool, &page).await?;

    Ok(Json(ProductPage {
        products,
        total_items,
        total_pages: page.total_pages(total_items),
        current_page: page.page,
    }))
}

/// GET /products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(product))
}

/// POST /products
///
/// Without `id`: create a product (a duplicate sku is a silent no-op).
/// With `id`: apply the supplied fields to that product.
pub async fn upsert(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UpsertProduct>,
) -> AppResult<impl IntoResponse> {
    if let Some(id) = input.id {
        let update = input.into_update();
        update.validate()?;

        let product = StockLedger::update_product(&state.pool, id, &update).await?;
        return Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Product updated successfully.").with_id(product.id)),
        ));
    }

    let create = input
        .into_create()
        .map_err(|field| AppError::BadRequest(format!("{field} is required")))?;
    create.validate()?;

    match StockLedger::create_product(&state.pool, &create).await? {
        Some(product) => Ok((
            StatusCode::CREATED,
            Json(
                MessageResponse::new("Product created successfully.")
                    .with_id(product.id)
                    .with_stock(Some(product.stock)),
            ),
        )),
        None => Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Product created successfully.")),
        )),
    }
}

/// DELETE /products/{id}
///
/// Soft-delete the product and every adjustment carrying its sku.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    StockLedger::delete_product(&state.pool, id).await?;
    Ok(Json(
        MessageResponse::new("Product and related adjustments soft-deleted successfully.")
            .with_id(id),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Populate an empty store from the configured catalog source.
async fn seed_from_catalog(state: &AppState) -> AppResult<()> {
    let records = state.catalog.fetch().await?;
    let fetched = records.len();
    let inserted = ProductRepo::seed(&state.pool, records).await?;
    tracing::info!(fetched, inserted, "Seeded products from catalog");
    Ok(())
}
