use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::MAX_PAGE_SIZE;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(Error::validation("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = if total == 0 {
            0
        } else {
            (total + request.page_size - 1) / request.page_size
        };

        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::new(None, None).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(PageRequest::new(Some(0), None).is_err());
        assert!(PageRequest::new(Some(-3), None).is_err());
        assert!(PageRequest::new(None, Some(0)).is_err());
        assert!(PageRequest::new(None, Some(MAX_PAGE_SIZE + 1)).is_err());
        assert!(PageRequest::new(None, Some(MAX_PAGE_SIZE)).is_ok());
    }

    #[test]
    fn test_five_items_two_per_page() {
        let first = Pagination::new(PageRequest::new(Some(1), Some(2)).unwrap(), 5);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(PageRequest::new(Some(3), Some(2)).unwrap(), 5);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_empty_result() {
        let p = Pagination::new(PageRequest::default(), 0);
        assert_eq!(p.total, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_page_past_the_end() {
        let request = PageRequest::new(Some(10), Some(2)).unwrap();
        assert_eq!(request.offset(), 18);
        let p = Pagination::new(request, 5);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_exact_multiple() {
        let p = Pagination::new(PageRequest::new(Some(2), Some(5)).unwrap(), 10);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next);
    }
}
