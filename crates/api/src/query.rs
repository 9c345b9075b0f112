//! Shared query parameter types for API handlers.

use serde::Deserialize;
use stockroom_core::pagination::PageRequest;

/// Page-based pagination parameters (`?page=&limit=`).
///
/// Resolved into a [`PageRequest`] with a per-listing default limit.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn resolve(&self, default_limit: i64) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }
}
