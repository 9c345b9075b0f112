//! HTTP client for the external product catalog.
//!
//! Reads a DummyJSON-shaped feed (`{"products": [...]}`) and maps each
//! record into a [`CatalogProduct`]. Field-level problems are left to the
//! seed, which skips records it cannot insert.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use stockroom_core::catalog::{CatalogError, CatalogProduct, CatalogSource};

/// HTTP request timeout for one catalog fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Top-level catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<RemoteProduct>,
}

/// One record as published by the feed. Every field is optional so a single
/// malformed record does not reject the whole document.
#[derive(Debug, Deserialize)]
struct RemoteProduct {
    title: Option<String>,
    sku: Option<String>,
    image: Option<String>,
    thumbnail: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    price: Option<f64>,
    description: Option<String>,
}

impl From<RemoteProduct> for CatalogProduct {
    fn from(remote: RemoteProduct) -> Self {
        let image = remote
            .image
            .or(remote.thumbnail)
            .or_else(|| remote.images.into_iter().next());
        Self {
            title: remote.title.unwrap_or_default(),
            sku: remote.sku.unwrap_or_default(),
            image,
            price: remote.price.unwrap_or(0.0),
            description: remote.description,
        }
    }
}

/// Parse a catalog document body.
pub fn parse_catalog(body: &[u8]) -> Result<Vec<CatalogProduct>, CatalogError> {
    let document: CatalogDocument =
        serde_json::from_slice(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(document.products.into_iter().map(CatalogProduct::from).collect())
}

/// Catalog source backed by an HTTP feed.
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    /// Create a catalog client for `url` with a bounded request timeout.
    pub fn new(url: String) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        tracing::info!(url = %self.url, "Fetching product catalog");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        parse_catalog(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
