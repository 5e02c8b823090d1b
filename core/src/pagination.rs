//! Page/limit normalization and pagination metadata.

use serde::Serialize;

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    /// Rows per page.
    pub limit: i64,
}

impl PageRequest {
    /// Normalizes raw query parameters: pages below 1 become 1 and
    /// non-positive limits fall back to [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: if limit > 0 { limit } else { DEFAULT_PAGE_SIZE },
        }
    }

    /// Row offset for SQL `OFFSET`.
    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Pagination metadata returned alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page number served.
    pub current_page: i64,
    /// Rows per page.
    pub limit: i64,
    /// Total pages (ceiling division, 0 when empty).
    pub total_pages: i64,
    /// Total matching rows.
    pub total_records: i64,
}

impl Pagination {
    /// Builds metadata for `total_records` rows served under `request`.
    #[must_use]
    pub const fn new(request: PageRequest, total_records: i64) -> Self {
        // A hand-built request can carry a non-positive limit; never
        // divide by less than 1.
        let limit = if request.limit > 0 { request.limit } else { 1 };
        Self {
            current_page: request.page,
            limit,
            total_pages: (total_records + limit - 1) / limit,
            total_records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_and_limit_are_normalized() {
        let req = PageRequest::new(0, -3);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(3, 20);
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn non_positive_limits_never_divide_by_zero() {
        for limit in [0, -3] {
            let meta = Pagination::new(PageRequest { page: 1, limit }, 7);
            assert_eq!(meta.limit, 1);
            assert_eq!(meta.total_pages, 7);
        }
    }

    #[test]
    fn total_pages_uses_ceiling_division() {
        let req = PageRequest::new(1, 10);
        assert_eq!(Pagination::new(req, 0).total_pages, 0);
        assert_eq!(Pagination::new(req, 10).total_pages, 1);
        assert_eq!(Pagination::new(req, 11).total_pages, 2);
        assert_eq!(Pagination::new(req, 25).total_pages, 3);
    }
}
