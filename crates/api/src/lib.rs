//! Stockroom API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! catalog client) so integration tests and the binary entrypoints can
//! both access them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
