//! Page Accumulator
//!
//! Merges an arriving page into the collection state. Replace overwrites the items,
//! Append concatenates in arrival order. No deduplication: the backend is assumed not
//! to repeat items across pages within one generation.

use crate::controller::CollectionState;
use crate::page::Page;

/// How an arriving page combines with the items already held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Page 1 of a reset fetch
    Replace,
    /// Next page of a continuation fetch
    Append,
}

/// Merge `page` into `current`, updating items and pagination counters.
///
/// Loading flags, errors and the generation are the controller's business and are
/// carried over untouched.
pub fn merge<T>(mut current: CollectionState<T>, page: Page<T>, mode: MergeMode) -> CollectionState<T> {
    match mode {
        MergeMode::Replace => current.items = page.items,
        MergeMode::Append => current.items.extend(page.items),
    }
    current.page_number = page.page_number;
    current.total_pages = page.total_pages;
    current.total_count = page.total_count;
    current
}
