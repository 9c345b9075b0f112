//! Stock reconciliation rule.
//!
//! A product's stock is its creation baseline plus the sum of the quantities
//! of its active adjustments. Every adjustment mutation is expressed as a
//! [`StockMovement`], which yields the delta to add to the product's stock
//! and decides whether the result is allowed to commit.
//!
//! Creates and updates are guarded: the resulting stock must be
//! non-negative, otherwise the whole mutation is rejected. Reversals
//! (adjustment deletes) always apply, even if the result is negative.

use crate::error::CoreError;
use crate::types::Quantity;

/// A change to a product's stock caused by an adjustment mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovement {
    /// A new adjustment records `qty` units.
    Create { qty: Quantity },
    /// An existing adjustment changes from `previous` to `next` units.
    Update { previous: Quantity, next: Quantity },
    /// An adjustment of `qty` units is soft-deleted.
    Reverse { qty: Quantity },
}

impl StockMovement {
    /// The amount to add to the product's stock.
    pub fn diff(&self) -> Result<Quantity, CoreError> {
        let diff = match *self {
            StockMovement::Create { qty } => Some(qty),
            StockMovement::Update { previous, next } => next.checked_sub(previous),
            StockMovement::Reverse { qty } => qty.checked_neg(),
        };
        diff.ok_or_else(|| CoreError::InvalidOperation("Stock change out of range".to_string()))
    }

    /// Whether the non-negative stock check applies to this movement.
    pub fn is_guarded(&self) -> bool {
        !matches!(self, StockMovement::Reverse { .. })
    }

    /// Compute the product's stock after this movement.
    ///
    /// Returns [`CoreError::InvalidOperation`] if a guarded movement would
    /// leave the stock negative, or if the addition overflows.
    pub fn apply(&self, stock: Quantity) -> Result<Quantity, CoreError> {
        let diff = self.diff()?;
        let next = stock
            .checked_add(diff)
            .ok_or_else(|| CoreError::InvalidOperation("Stock change out of range".to_string()))?;

        if self.is_guarded() && next < 0 {
            return Err(CoreError::InvalidOperation(format!(
                "Stock cannot be negative (current stock {stock}, change {diff})"
            )));
        }

        Ok(next)
    }
}

/// Validate the stock baseline supplied when a product is created.
pub fn validate_initial_stock(stock: Quantity) -> Result<(), CoreError> {
    if stock < 0 {
        return Err(CoreError::Validation(format!(
            "Initial stock must be non-negative, got {stock}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
