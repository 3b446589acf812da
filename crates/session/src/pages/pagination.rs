//! Manual page tracking without a server-side total

use raiser_http::types::PageQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    items_per_page: u32,
    last_fetch_len: Option<usize>,
}

impl Pagination {
    /// Start on page 1; a zero page size is bumped to 1
    pub fn new(items_per_page: u32) -> Self {
        Self {
            page: 1,
            items_per_page: items_per_page.max(1),
            last_fetch_len: None,
        }
    }

    /// 1-based page number
    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub const fn query(&self) -> PageQuery {
        PageQuery {
            skip: (self.page - 1).saturating_mul(self.items_per_page),
            limit: self.items_per_page,
        }
    }

    /// Remember how many rows the last request returned
    pub const fn record_fetch(&mut self, len: usize) {
        self.last_fetch_len = Some(len);
    }

    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// A full last page suggests there may be more
    pub fn has_next(&self) -> bool {
        self.last_fetch_len == Some(self.items_per_page as usize)
    }

    /// Advance if allowed; returns whether the page changed
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        self.last_fetch_len = None;
        true
    }

    pub const fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        self.last_fetch_len = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_offsets() {
        let mut pagination = Pagination::new(10);
        assert_eq!(pagination.query(), PageQuery { skip: 0, limit: 10 });

        pagination.record_fetch(10);
        assert!(pagination.next());
        assert_eq!(pagination.query(), PageQuery { skip: 10, limit: 10 });
    }

    #[test]
    fn test_next_disabled_on_short_page() {
        let mut pagination = Pagination::new(10);
        pagination.record_fetch(9);
        assert!(!pagination.has_next());
        assert!(!pagination.next());
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_next_disabled_before_first_fetch() {
        let pagination = Pagination::new(10);
        assert!(!pagination.has_next());
        assert!(!pagination.has_previous());
    }

    #[test]
    fn test_previous_stops_at_first_page() {
        let mut pagination = Pagination::new(5);
        pagination.record_fetch(5);
        pagination.next();
        assert!(pagination.previous());
        assert!(!pagination.previous());
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        assert_eq!(Pagination::new(0).items_per_page(), 1);
    }
}
