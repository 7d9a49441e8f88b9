//! Page requests and paged result sets
//!
//! List endpoints never return an unbounded result set. Callers ask for a
//! 1-based page of a given size and receive the slice together with the total
//! row count so they can request the next window.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// A request for one window of a result set
///
/// Always holds a page of at least 1 and a size within `1..=MAX_PAGE_SIZE`;
/// deserialization goes through [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    size: u32,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: u32,
    size: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = CoreError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.size)
    }
}

impl PageRequest {
    /// Creates a page request
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPage` when `page` is zero or `size` is
    /// outside `1..=MAX_PAGE_SIZE`
    pub fn new(page: u32, size: u32) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::invalid_page("page must be at least 1"));
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(CoreError::invalid_page(format!(
                "size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, size })
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }

    /// Maximum number of rows on this page
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One window of a result set plus the metadata needed to fetch the rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of rows matching the query across all pages
    pub total: u64,
    pub page: u32,
    pub size: u32,
    /// Total number of pages; zero when nothing matched
    pub pages: u64,
}

impl<T> Page<T> {
    /// Assembles a page from the rows fetched for `request`
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let size = u64::from(request.size.max(1));
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
            pages: total.div_ceil(size),
        }
    }

    /// Slices an in-memory result set down to the requested window
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Self::new(items, total, request)
    }

    /// Returns true if another page follows this one
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.pages
    }

    /// Transforms the items while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::new(vec![1, 2], 5, PageRequest::new(1, 2).unwrap());
        assert_eq!(page.pages, 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_deserialize_enforces_bounds() {
        assert!(serde_json::from_str::<PageRequest>(r#"{"page":0,"size":0}"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{"page":1,"size":0}"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{"page":1,"size":101}"#).is_err());

        let request: PageRequest = serde_json::from_str(r#"{"page":2,"size":10}"#).unwrap();
        assert_eq!(request, PageRequest::new(2, 10).unwrap());
        assert_eq!(request.offset(), 10);
    }
}
