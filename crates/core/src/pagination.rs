//! Page/limit pagination shared by the product and adjustment listings.
//!
//! A limit of zero means "no pagination": every active row is returned and
//! the listing reports a single page.

/// Default page size for the product listing (all rows).
pub const DEFAULT_PRODUCT_LIMIT: i64 = 0;

/// Default page size for the adjustment listing.
pub const DEFAULT_ADJUSTMENT_LIMIT: i64 = 10;

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    /// Page size; `0` returns every row.
    pub limit: i64,
}

impl PageRequest {
    /// Resolve user-supplied `page` / `limit` values.
    ///
    /// Missing or non-positive pages become page 1. Missing limits use
    /// `default_limit`; negative limits are treated as zero.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).max(0),
        }
    }

    /// Whether every row should be returned in one page.
    pub fn is_unpaginated(&self) -> bool {
        self.limit == 0
    }

    /// Row offset for the `OFFSET` clause.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `LIMIT` clause value, or `None` when unpaginated.
    pub fn sql_limit(&self) -> Option<i64> {
        (!self.is_unpaginated()).then_some(self.limit)
    }

    /// Number of pages needed to show `total_items`.
    pub fn total_pages(&self, total_items: i64) -> i64 {
        total_pages(total_items, self.limit)
    }
}

/// `ceil(total_items / limit)`, or `1` when `limit` is zero.
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 1;
    }
    let total_items = total_items.max(0);
    total_items / limit + i64::from(total_items % limit != 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
