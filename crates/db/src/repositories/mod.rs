//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Helpers used inside ledger
//! transactions take `&mut Transaction` instead and are crate-private.

pub mod adjustment_repo;
pub mod product_repo;

pub use adjustment_repo::AdjustmentRepo;
pub use product_repo::ProductRepo;
