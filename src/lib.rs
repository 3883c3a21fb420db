//! Pagewise: Incremental Filtered Collections
//!
//! A UI-framework-independent controller for the "search box + filters + infinite
//! list" pattern used by admin pages (expenses, support messages, todos). It debounces
//! free-text search, resets the collection when filters change, appends pages as the
//! end-of-list sentinel becomes visible, seeds role-locked filters, and discards
//! responses that belong to a superseded request generation.

pub mod accumulator;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod logging;
pub mod page;
pub mod tooling;
pub mod types;
pub mod visibility;

pub use controller::{CollectionController, CollectionState, FetchTicket};
pub use error::{ApiError, ErrorKind, FetchError};
pub use filter::{FilterField, FilterSet, FilterValue, PageQuery, Role};
pub use page::Page;
pub use types::{Generation, Identity, SentinelHandle};
