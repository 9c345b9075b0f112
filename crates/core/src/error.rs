use crate::types::DbId;

/// Domain-level failures shared by the store and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: {entity} with sku {sku}")]
    SkuNotFound { entity: &'static str, sku: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but would break a ledger rule
    /// (negative stock, duplicate sku on rename).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
