//! Collection state snapshot.

use crate::error::{ErrorKind, FetchError};
use crate::types::Generation;

/// Visible state of a collection view
///
/// Owned and mutated exclusively by its controller; callers receive clones.
/// At most one of `is_loading_initial` / `is_loading_more` is set at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    /// Page order, then within-page order
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub last_error: Option<FetchError>,
    pub generation: Generation,
}

impl<T> CollectionState<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_number: 1,
            total_pages: 1,
            total_count: 0,
            is_loading_initial: false,
            is_loading_more: false,
            last_error: None,
            generation: Generation::INITIAL,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more
    }

    /// Whether a continuation fetch would find another page.
    pub fn has_more(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn last_error_kind(&self) -> Option<ErrorKind> {
        self.last_error.as_ref().map(FetchError::kind)
    }

    /// The last fetch failed because the session is no longer valid.
    pub fn requires_login(&self) -> bool {
        self.last_error_kind() == Some(ErrorKind::Auth)
    }
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self::empty()
    }
}
