//! Adjustment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Quantity, Timestamp};

/// A row from the `adjustments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Adjustment {
    pub id: DbId,
    pub sku: String,
    pub qty: Quantity,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
}

/// An active adjustment joined with its product.
///
/// `amount` is `price * qty` at read time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdjustmentDetail {
    pub id: DbId,
    pub product_id: DbId,
    pub sku: String,
    pub qty: Quantity,
    pub amount: f64,
    pub created_at: Timestamp,
}

/// Body of `POST /adjustments`: a create when `id` is absent, an update
/// otherwise. On update the stored sku wins and `sku` is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertAdjustment {
    pub id: Option<DbId>,
    pub sku: Option<String>,
    pub qty: Quantity,
}

/// Outcome of a stock-changing adjustment operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockChange {
    pub adjustment_id: DbId,
    pub sku: String,
    /// Amount added to the product's stock.
    pub diff: Quantity,
    /// Product stock after the change, or `None` if no active product
    /// carried the sku (reversal of an orphaned adjustment).
    pub stock: Option<Quantity>,
}
