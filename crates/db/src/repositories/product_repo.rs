//! Repository for the `products` table.

use sqlx::{PgPool, Postgres, Transaction};
use stockroom_core::catalog::CatalogProduct;
use stockroom_core::pagination::PageRequest;
use stockroom_core::types::{DbId, Quantity};

use crate::models::product::{CreateProduct, Product, ProductStock, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, sku, image, price::float8 AS price, description, stock, \
                       created_at, updated_at, deleted_at";

/// Provides reads, inserts and the first-run catalog seed for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    ///
    /// Returns `None` if the sku already exists (including on a soft-deleted
    /// row); the insert is then a no-op.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (title, sku, image, price, description, stock)
             VALUES ($1, $2, $3, $4::float8, $5, COALESCE($6, 0))
             ON CONFLICT (sku) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.title)
            .bind(&input.sku)
            .bind(&input.image)
            .bind(input.price)
            .bind(&input.description)
            .bind(input.stock)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by sku. Excludes soft-deleted rows.
    pub async fn find_by_sku(pool: &PgPool, sku: &str) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE sku = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Product>(&query)
            .bind(sku)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active products, most recently created first.
    pub async fn list(pool: &PgPool, page: &PageRequest) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(page.sql_limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count active products.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Count every product row, soft-deleted ones included.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Insert catalog records, ignoring sku conflicts.
    ///
    /// Records that cannot become products are skipped with a warning.
    /// Returns the number of rows actually inserted.
    pub async fn seed(pool: &PgPool, records: Vec<CatalogProduct>) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for record in records {
            if let Some(reason) = record.rejection_reason() {
                tracing::warn!(sku = %record.sku, reason, "Skipping catalog record");
                continue;
            }
            let input = CreateProduct::from(record);
            let result = sqlx::query(
                "INSERT INTO products (title, sku, image, price, description)
                 VALUES ($1, $2, $3, $4::float8, $5)
                 ON CONFLICT (sku) DO NOTHING",
            )
            .bind(&input.title)
            .bind(&input.sku)
            .bind(&input.image)
            .bind(input.price)
            .bind(&input.description)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    // -----------------------------------------------------------------------
    // Transaction helpers (used by the ledger)
    // -----------------------------------------------------------------------

    /// Lock an active product by sku for a stock check.
    pub(crate) async fn lock_by_sku(
        tx: &mut Transaction<'_, Postgres>,
        sku: &str,
    ) -> Result<Option<ProductStock>, sqlx::Error> {
        sqlx::query_as::<_, ProductStock>(
            "SELECT id, sku, stock FROM products
             WHERE sku = $1 AND deleted_at IS NULL
             FOR UPDATE",
        )
        .bind(sku)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Lock an active product by ID.
    pub(crate) async fn lock_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<ProductStock>, sqlx::Error> {
        sqlx::query_as::<_, ProductStock>(
            "SELECT id, sku, stock FROM products
             WHERE id = $1 AND deleted_at IS NULL
             FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Overwrite the stock of a product locked by the caller.
    pub(crate) async fn set_stock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        stock: Quantity,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE products SET stock = $2 WHERE id = $1")
            .bind(id)
            .bind(stock)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Whether any product other than `id` already uses `sku`.
    ///
    /// Soft-deleted rows count: skus are never reused.
    pub(crate) async fn sku_taken_by_other(
        tx: &mut Transaction<'_, Postgres>,
        sku: &str,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE sku = $1 AND id <> $2)")
                .bind(sku)
                .bind(id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(taken)
    }

    /// Apply a partial update. Only non-`None` fields are written.
    pub(crate) async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                title = COALESCE($2, title),
                sku = COALESCE($3, sku),
                image = COALESCE($4, image),
                price = COALESCE($5::float8, price),
                description = COALESCE($6, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.sku)
            .bind(&input.image)
            .bind(input.price)
            .bind(&input.description)
            .fetch_one(&mut **tx)
            .await
    }

    /// Soft-delete an active product, returning its sku.
    pub(crate) async fn soft_delete(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "UPDATE products SET deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING sku",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(|(sku,)| sku))
    }
}
