//! Handlers for the `/adjustments` resource.
//!
//! Every write moves the owning product's stock through [`StockLedger`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::pagination::DEFAULT_ADJUSTMENT_LIMIT;
use stockroom_core::types::DbId;
use stockroom_db::ledger::StockLedger;
use stockroom_db::models::adjustment::UpsertAdjustment;
use stockroom_db::repositories::AdjustmentRepo;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::query::PageParams;
use crate::response::{AdjustmentPage, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /adjustments?page=1&limit=10
///
/// List active adjustments joined with their product, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.resolve(DEFAULT_ADJUSTMENT_LIMIT);

    let total_items = AdjustmentRepo::count_active(&state.pool).await?;
    let adjustments = AdjustmentRepo::list_details(&state.pool, &page).await?;

    Ok(Json(AdjustmentPage {
        adjustments,
        total_items,
        total_pages: page.total_pages(total_items),
        current_page: page.page,
    }))
}

/// GET /adjustments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let adjustment = AdjustmentRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Adjustment",
            id,
        }))?;
    Ok(Json(adjustment))
}

/// POST /adjustments
///
/// Without `id`: record a new adjustment against `sku`.
/// With `id`: change that adjustment's quantity; its stored sku is kept.
pub async fn upsert(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UpsertAdjustment>,
) -> AppResult<impl IntoResponse> {
    if let Some(id) = input.id {
        let change = StockLedger::update_adjustment(&state.pool, id, input.qty).await?;
        return Ok((
            StatusCode::OK,
            Json(
                MessageResponse::new("Adjustment updated successfully.")
                    .with_id(change.adjustment_id)
                    .with_stock(change.stock),
            ),
        ));
    }

    let sku = input
        .sku
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("sku is required".to_string()))?;

    let change = StockLedger::create_adjustment(&state.pool, &sku, input.qty).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            MessageResponse::new("Adjustment created successfully.")
                .with_id(change.adjustment_id)
                .with_stock(change.stock),
        ),
    ))
}

/// DELETE /adjustments/{id}
///
/// Soft-delete the adjustment and reverse its quantity on the product.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let change = StockLedger::delete_adjustment(&state.pool, id).await?;
    Ok(Json(
        MessageResponse::new("Adjustment soft-deleted successfully.")
            .with_id(id)
            .with_stock(change.stock),
    ))
}
