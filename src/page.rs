//! Pages
//!
//! One page of a collection as returned by the backend, plus the envelope decoding
//! used by the HTTP fetcher.

use serde::Deserialize;

/// One page of items
///
/// Invariants: `page_number >= 1`, `total_pages >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Create a page, clamping counters to their invariants.
    pub fn new(items: Vec<T>, page_number: u32, total_pages: u32, total_count: u64) -> Self {
        Self {
            items,
            page_number: page_number.max(1),
            total_pages: total_pages.max(1),
            total_count,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}

/// Backend response body
///
/// Accepts both `{ items, pageNumber, totalPages, totalCount }` and the
/// `{ data, page, totalPages, total }` spelling.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    #[serde(alias = "data")]
    pub items: Vec<T>,
    #[serde(default, alias = "page")]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "total")]
    pub total_count: Option<u64>,
}

impl<T> PageEnvelope<T> {
    /// Convert to a page, falling back to the requested page number and to a single
    /// page when the backend omits counters. An empty result reports one page.
    pub fn into_page(self, requested_page: u32) -> Page<T> {
        let total_count = self.total_count.unwrap_or(self.items.len() as u64);
        Page::new(
            self.items,
            self.page_number.unwrap_or(requested_page),
            self.total_pages.unwrap_or(1),
            total_count,
        )
    }
}
