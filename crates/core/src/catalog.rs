//! External product catalog used to seed an empty store.
//!
//! The seed runs once, the first time products are listed while the store
//! has never held a product. The source is injected behind [`CatalogSource`] so the
//! seed can be exercised without network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::MAX_PRICE;

/// A candidate product read from the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub title: String,
    pub sku: String,
    pub image: Option<String>,
    pub price: f64,
    pub description: Option<String>,
}

impl CatalogProduct {
    /// Reason this record cannot become a product, if any.
    pub fn rejection_reason(&self) -> Option<&'static str> {
        if self.sku.trim().is_empty() {
            Some("missing sku")
        } else if self.title.trim().is_empty() {
            Some("missing title")
        } else if !self.price.is_finite() || !(0.0..=MAX_PRICE).contains(&self.price) {
            Some("invalid price")
        } else {
            None
        }
    }
}

/// Errors raised while reading the external catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request itself failed (network, DNS, TLS, timeout).
    #[error("Catalog request failed: {0}")]
    Request(String),

    /// The catalog returned a non-2xx status code.
    #[error("Catalog returned HTTP {0}")]
    HttpStatus(u16),

    /// The response body was not a valid catalog document.
    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),
}

/// A source of candidate products for the first-run seed.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every candidate product.
    async fn fetch(&self) -> Result<Vec<CatalogProduct>, CatalogError>;
}

/// A fixed, in-memory catalog. An empty one disables seeding.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<CatalogProduct>,
}

impl StaticCatalog {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        Ok(self.products.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
