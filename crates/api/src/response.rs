//! Shared response body types for API handlers.
//!
//! Listings use a camelCase envelope (`totalItems`, `totalPages`,
//! `currentPage`) next to the rows; writes answer with a [`MessageResponse`].

use serde::Serialize;
use stockroom_core::types::{DbId, Quantity};
use stockroom_db::models::adjustment::AdjustmentDetail;
use stockroom_db::models::product::Product;

/// `GET /products` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// `GET /adjustments` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentPage {
    pub adjustments: Vec<AdjustmentDetail>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Acknowledgment for create/update/delete requests.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    /// Product stock after a stock-changing request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<Quantity>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            id: None,
            stock: None,
        }
    }

    pub fn with_id(mut self, id: DbId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_stock(mut self, stock: Option<Quantity>) -> Self {
        self.stock = stock;
        self
    }
}
