//! Shared query parameter types for API handlers.

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum page size for list endpoints.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page=&page_size=`).
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Clamp to a sane `(limit, offset)` pair: page ≥ 1, page size
    /// between 1 and [`MAX_PAGE_SIZE`].
    pub fn to_limit_offset(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page_size, (page - 1) * page_size)
    }
}
