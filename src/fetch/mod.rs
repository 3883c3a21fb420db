//! Fetch collaborator contract.
//!
//! The controller issues [`PageQuery`]s through this trait and never touches the
//! transport. Timeouts are the collaborator's concern: it surfaces them as
//! [`FetchError::Network`].

pub mod http;

pub use http::HttpPageFetcher;

use crate::error::FetchError;
use crate::filter::PageQuery;
use crate::page::Page;
use async_trait::async_trait;

/// Source of collection pages.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch one page. Async because it makes network requests.
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page<T>, FetchError>;
}
