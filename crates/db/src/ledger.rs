//! Stock ledger: every operation that changes a product's stock or the set
//! of adjustments attributed to it.
//!
//! Each operation runs in a single transaction. The product row is locked
//! with `FOR UPDATE` before the stock check, so concurrent adjustments to
//! the same sku serialize and cannot jointly drive stock negative. Locks are
//! always taken product first, then adjustment; an adjustment whose sku is
//! renamed between the unlocked read and the locks is retried in a fresh
//! transaction.

use sqlx::{PgPool, Postgres, Transaction};
use stockroom_core::error::CoreError;
use stockroom_core::stock::{validate_initial_stock, StockMovement};
use stockroom_core::types::{DbId, Quantity};

use crate::models::adjustment::{Adjustment, StockChange};
use crate::models::product::{CreateProduct, Product, ProductStock, UpdateProduct};
use crate::repositories::{AdjustmentRepo, ProductRepo};

/// How many times an adjustment update or delete starts over when the
/// adjustment's sku is renamed between reading and locking it.
const LOCK_ATTEMPTS: usize = 3;

/// Failure of a ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A domain rule rejected the operation; nothing was written.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of a product soft delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDeletion {
    pub sku: String,
    /// Number of active adjustments soft-deleted alongside the product.
    pub adjustments_deleted: u64,
}

/// Transactional stock operations.
pub struct StockLedger;

impl StockLedger {
    /// Record a new adjustment of `qty` units against `sku`.
    ///
    /// Fails with `SkuNotFound` if no active product carries the sku and with
    /// `InvalidOperation` if the product's stock would become negative.
    pub async fn create_adjustment(
        pool: &PgPool,
        sku: &str,
        qty: Quantity,
    ) -> Result<StockChange, LedgerError> {
        let mut tx = pool.begin().await?;

        let product = ProductRepo::lock_by_sku(&mut tx, sku)
            .await?
            .ok_or_else(|| CoreError::SkuNotFound {
                entity: "Product",
                sku: sku.to_string(),
            })?;

        let movement = StockMovement::Create { qty };
        let stock = Self::check(&movement, &product.sku, product.stock)?;

        let adjustment = AdjustmentRepo::insert(&mut tx, &product.sku, qty).await?;
        ProductRepo::set_stock(&mut tx, product.id, stock).await?;
        tx.commit().await?;

        tracing::info!(
            adjustment_id = adjustment.id,
            sku = %product.sku,
            diff = qty,
            stock,
            "Adjustment created"
        );

        Ok(StockChange {
            adjustment_id: adjustment.id,
            sku: product.sku,
            diff: qty,
            stock: Some(stock),
        })
    }

    /// Change the quantity of an active adjustment to `qty`.
    ///
    /// The adjustment keeps its stored sku. The product's stock moves by
    /// `qty - previous`.
    pub async fn update_adjustment(
        pool: &PgPool,
        id: DbId,
        qty: Quantity,
    ) -> Result<StockChange, LedgerError> {
        for attempt in 1..=LOCK_ATTEMPTS {
            let mut tx = pool.begin().await?;

            let Some((product, adjustment)) = Self::lock_adjustment(&mut tx, id).await? else {
                tx.rollback().await?;
                tracing::debug!(adjustment_id = id, attempt, "Adjustment sku moved while locking");
                continue;
            };
            let product = product.ok_or_else(|| CoreError::SkuNotFound {
                entity: "Product",
                sku: adjustment.sku.clone(),
            })?;

            let movement = StockMovement::Update {
                previous: adjustment.qty,
                next: qty,
            };
            let diff = movement.diff()?;
            let stock = Self::check(&movement, &product.sku, product.stock)?;

            AdjustmentRepo::set_qty(&mut tx, id, qty).await?;
            ProductRepo::set_stock(&mut tx, product.id, stock).await?;
            tx.commit().await?;

            tracing::info!(adjustment_id = id, sku = %product.sku, diff, stock, "Adjustment updated");

            return Ok(StockChange {
                adjustment_id: id,
                sku: product.sku,
                diff,
                stock: Some(stock),
            });
        }

        Err(Self::sku_kept_moving(id))
    }

    /// Soft-delete an active adjustment and reverse its quantity.
    ///
    /// The reversal is not guarded: if stock was consumed elsewhere the
    /// product may end up negative, which is logged.
    pub async fn delete_adjustment(pool: &PgPool, id: DbId) -> Result<StockChange, LedgerError> {
        for attempt in 1..=LOCK_ATTEMPTS {
            let mut tx = pool.begin().await?;

            let Some((product, adjustment)) = Self::lock_adjustment(&mut tx, id).await? else {
                tx.rollback().await?;
                tracing::debug!(adjustment_id = id, attempt, "Adjustment sku moved while locking");
                continue;
            };
            let sku = adjustment.sku;

            let movement = StockMovement::Reverse {
                qty: adjustment.qty,
            };
            let diff = movement.diff()?;

            AdjustmentRepo::soft_delete(&mut tx, id).await?;

            let stock = match product {
                Some(product) => {
                    let stock = movement.apply(product.stock)?;
                    ProductRepo::set_stock(&mut tx, product.id, stock).await?;
                    if stock < 0 {
                        tracing::warn!(sku = %sku, stock, "Adjustment reversal left stock negative");
                    }
                    Some(stock)
                }
                None => {
                    tracing::warn!(adjustment_id = id, sku = %sku, "Deleted adjustment has no active product");
                    None
                }
            };

            tx.commit().await?;

            tracing::info!(adjustment_id = id, sku = %sku, diff, ?stock, "Adjustment deleted");

            return Ok(StockChange {
                adjustment_id: id,
                sku,
                diff,
                stock,
            });
        }

        Err(Self::sku_kept_moving(id))
    }

    /// Create a product with an optional stock baseline.
    ///
    /// Returns `None` when the sku already exists; that is a silent no-op,
    /// not an error.
    pub async fn create_product(
        pool: &PgPool,
        input: &CreateProduct,
    ) -> Result<Option<Product>, LedgerError> {
        validate_initial_stock(input.stock.unwrap_or(0))?;

        let product = ProductRepo::create(pool, input).await?;
        match &product {
            Some(p) => tracing::info!(product_id = p.id, sku = %p.sku, stock = p.stock, "Product created"),
            None => tracing::debug!(sku = %input.sku, "Product sku already exists, create ignored"),
        }
        Ok(product)
    }

    /// Apply a partial update to an active product.
    ///
    /// A sku change is rejected if any other product (soft-deleted ones
    /// included) uses the new sku; otherwise every adjustment is repointed
    /// to the new sku in the same transaction.
    pub async fn update_product(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Product, LedgerError> {
        let mut tx = pool.begin().await?;

        if let Some(sku) = &input.sku {
            if ProductRepo::sku_taken_by_other(&mut tx, sku, id).await? {
                return Err(CoreError::InvalidOperation(format!(
                    "A product with sku {sku} already exists"
                ))
                .into());
            }
        }

        let current = ProductRepo::lock_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Product",
                id,
            })?;

        let product = ProductRepo::update(&mut tx, id, input).await?;

        if product.sku != current.sku {
            let repointed = AdjustmentRepo::repoint_sku(&mut tx, &current.sku, &product.sku).await?;
            tracing::info!(
                product_id = id,
                old_sku = %current.sku,
                new_sku = %product.sku,
                repointed,
                "Product sku renamed"
            );
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Soft-delete an active product and all of its active adjustments.
    pub async fn delete_product(pool: &PgPool, id: DbId) -> Result<ProductDeletion, LedgerError> {
        let mut tx = pool.begin().await?;

        let sku = ProductRepo::soft_delete(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Product",
                id,
            })?;
        let adjustments_deleted = AdjustmentRepo::soft_delete_by_sku(&mut tx, &sku).await?;

        tx.commit().await?;

        tracing::info!(product_id = id, sku = %sku, adjustments_deleted, "Product deleted");

        Ok(ProductDeletion {
            sku,
            adjustments_deleted,
        })
    }

    /// Lock the product carrying an adjustment's sku, then the adjustment.
    ///
    /// The sku is first read without a lock, so a rename can commit before
    /// the locks are taken. Returns `None` when the locked adjustment no
    /// longer carries the sku that was read; the caller rolls back and
    /// starts over. The product is `None` if no active product carries the
    /// sku.
    async fn lock_adjustment(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<(Option<ProductStock>, Adjustment)>, LedgerError> {
        let not_found = || CoreError::NotFound {
            entity: "Adjustment",
            id,
        };

        let sku = AdjustmentRepo::find_sku(tx, id)
            .await?
            .ok_or_else(not_found)?;
        let product = ProductRepo::lock_by_sku(tx, &sku).await?;
        let adjustment = AdjustmentRepo::lock(tx, id)
            .await?
            .ok_or_else(not_found)?;

        if adjustment.sku != sku {
            return Ok(None);
        }
        Ok(Some((product, adjustment)))
    }

    fn sku_kept_moving(id: DbId) -> LedgerError {
        CoreError::InvalidOperation(format!(
            "Adjustment {id} changed product while being updated; retry the request"
        ))
        .into()
    }

    /// Apply a guarded movement, logging rejections.
    fn check(movement: &StockMovement, sku: &str, stock: Quantity) -> Result<Quantity, CoreError> {
        movement.apply(stock).inspect_err(|e| {
            tracing::debug!(sku, stock, ?movement, error = %e, "Stock movement rejected");
        })
    }
}
