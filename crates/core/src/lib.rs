//! Domain types and rules for the stockroom inventory service.
//!
//! This crate has no I/O. The database and HTTP crates build on the rules
//! defined here (stock reconciliation, pagination math, the catalog source
//! contract) so they can be tested without a running store.

pub mod catalog;
pub mod error;
pub mod pagination;
pub mod stock;
pub mod types;
