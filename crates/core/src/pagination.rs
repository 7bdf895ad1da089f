//! Page-window arithmetic for paginated listings.

use serde::Serialize;

use crate::error::CoreError;

/// Page number used when the client does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of items per page.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Maximum number of items per page.
pub const MAX_PER_PAGE: i64 = 100;

/// A validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Build a page request from optional query values.
    ///
    /// `page` must be >= 1 and `per_page` must lie in `[1, MAX_PER_PAGE]`.
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Result<Self, CoreError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(CoreError::Validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Row limit for this page.
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Slice one page out of an already ordered, fully materialized list.
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).collect()
    }
}

/// `ceil(total / per_page)`; zero when there are no rows.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn total_pages_for_empty_result_is_zero() {
        assert_eq!(total_pages(0, 20), 0);
    }

    #[test]
    fn total_pages_matches_ceil_division() {
        for total in 0..250_i64 {
            for per_page in 1..=MAX_PER_PAGE {
                let expected = (total as f64 / per_page as f64).ceil() as i64;
                assert_eq!(total_pages(total, per_page), expected);
            }
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::new(None, None).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let req = PageRequest::new(Some(3), Some(20)).unwrap();
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn rejects_page_zero() {
        assert!(PageRequest::new(Some(0), None).is_err());
    }

    #[test]
    fn rejects_per_page_out_of_range() {
        assert!(PageRequest::new(None, Some(0)).is_err());
        assert!(PageRequest::new(None, Some(MAX_PER_PAGE + 1)).is_err());
        assert!(PageRequest::new(None, Some(MAX_PER_PAGE)).is_ok());
    }

    #[test]
    fn window_returns_requested_slice() {
        let items: Vec<i32> = (1..=45).collect();
        let req = PageRequest::new(Some(3), Some(20)).unwrap();
        assert_eq!(req.window(items), vec![41, 42, 43, 44, 45]);
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let items: Vec<i32> = (1..=5).collect();
        let req = PageRequest::new(Some(4), Some(5)).unwrap();
        assert!(req.window(items).is_empty());
    }
}
