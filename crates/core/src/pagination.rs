//! Offset pagination for list endpoints
//!
//! Every list endpoint takes `page`/`size` query parameters and wraps
//! its items in the same envelope: the items plus page, size, total,
//! page count, and has_next/has_prev flags.

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of items per page
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw page/size query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PaginationParams {
    /// Clamp into a usable page: page >= 1, 1 <= size <= 100.
    pub fn clamped(&self) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let size = self
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Page { page, size }
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub size: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.size
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// Pagination metadata returned alongside list items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: Page, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + page.size - 1) / page.size
        };
        Self {
            page: page.page,
            size: page.size,
            total,
            pages,
            has_next: page.page < pages,
            has_prev: page.page > 1 && total > 0,
        }
    }
}

/// Generic paginated list envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: Page, total: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(page, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams {
            page: None,
            size: None,
        };
        let page = params.clamped();
        assert_eq!(page.page, 1);
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let params = PaginationParams {
            page: Some(0),
            size: Some(500),
        };
        let page = params.clamped();
        assert_eq!(page.page, 1);
        assert_eq!(page.size, MAX_PAGE_SIZE);

        let params = PaginationParams {
            page: Some(-2),
            size: Some(0),
        };
        let page = params.clamped();
        assert_eq!(page.page, 1);
        assert_eq!(page.size, 1);
    }

    #[test]
    fn test_offset_math() {
        let page = Page { page: 3, size: 20 };
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn test_envelope_math() {
        let page = Page { page: 2, size: 20 };
        let meta = Pagination::new(page, 45);
        assert_eq!(meta.pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let meta = Pagination::new(Page { page: 1, size: 20 }, 0);
        assert_eq!(meta.pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);

        let meta = Pagination::new(Page { page: 3, size: 20 }, 45);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }
}
