//! Repository for the `adjustments` table.

use sqlx::{PgPool, Postgres, Transaction};
use stockroom_core::pagination::PageRequest;
use stockroom_core::types::{DbId, Quantity};

use crate::models::adjustment::{Adjustment, AdjustmentDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, sku, qty, created_at, updated_at, deleted_at";

/// Joined projection used by the detail and list reads.
const DETAIL_SELECT: &str = "SELECT a.id, p.id AS product_id, a.sku, a.qty, \
                             (p.price * a.qty)::float8 AS amount, a.created_at \
                             FROM adjustments a \
                             JOIN products p ON p.sku = a.sku";

/// Provides reads over adjustments. Stock-changing writes live in
/// [`crate::ledger::StockLedger`].
pub struct AdjustmentRepo;

impl AdjustmentRepo {
    /// Find an adjustment by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Adjustment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM adjustments WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Adjustment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every adjustment carrying `sku`, including soft-deleted rows.
    pub async fn list_by_sku_include_deleted(
        pool: &PgPool,
        sku: &str,
    ) -> Result<Vec<Adjustment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM adjustments WHERE sku = $1 ORDER BY id");
        sqlx::query_as::<_, Adjustment>(&query)
            .bind(sku)
            .fetch_all(pool)
            .await
    }

    /// Find an active adjustment joined with its product.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AdjustmentDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1 AND a.deleted_at IS NULL");
        sqlx::query_as::<_, AdjustmentDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active adjustments joined with their products, newest first.
    pub async fn list_details(
        pool: &PgPool,
        page: &PageRequest,
    ) -> Result<Vec<AdjustmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE a.deleted_at IS NULL
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AdjustmentDetail>(&query)
            .bind(page.sql_limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count active adjustments.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM adjustments WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Transaction helpers (used by the ledger)
    // -----------------------------------------------------------------------

    /// Read the sku of an active adjustment without locking it.
    pub(crate) async fn find_sku(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT sku FROM adjustments WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        Ok(row.map(|(sku,)| sku))
    }

    /// Lock an active adjustment.
    pub(crate) async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Adjustment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM adjustments WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, Adjustment>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        sku: &str,
        qty: Quantity,
    ) -> Result<Adjustment, sqlx::Error> {
        let query = format!("INSERT INTO adjustments (sku, qty) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Adjustment>(&query)
            .bind(sku)
            .bind(qty)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_qty(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        qty: Quantity,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE adjustments SET qty = $2 WHERE id = $1")
            .bind(id)
            .bind(qty)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub(crate) async fn soft_delete(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE adjustments SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Soft-delete every active adjustment carrying `sku`.
    pub(crate) async fn soft_delete_by_sku(
        tx: &mut Transaction<'_, Postgres>,
        sku: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE adjustments SET deleted_at = NOW() WHERE sku = $1 AND deleted_at IS NULL",
        )
        .bind(sku)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Repoint every adjustment from `old_sku` to `new_sku`, soft-deleted
    /// rows included.
    pub(crate) async fn repoint_sku(
        tx: &mut Transaction<'_, Postgres>,
        old_sku: &str,
        new_sku: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE adjustments SET sku = $2 WHERE sku = $1")
            .bind(old_sku)
            .bind(new_sku)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
