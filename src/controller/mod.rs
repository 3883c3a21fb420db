//! Collection Controller
//!
//! Orchestrates filters, debounce, request generations, page merging and the
//! end-of-list trigger for one collection view.
//!
//! State machine: `Idle -> LoadingInitial -> Idle(items)` for reset fetches and,
//! orthogonally, `Idle(items) -> LoadingMore -> Idle(more items)` for continuations.
//! Every fetch is tagged with the generation active when it was issued; a response is
//! applied iff that generation is still current, so arrival order never matters.
//!
//! Items are replaced lazily: a reset fetch keeps the previous items visible (under
//! `is_loading_initial`) until the replacement page arrives. Pagination counters are
//! reset eagerly so no continuation can be issued against the superseded items.

mod state;

pub use state::CollectionState;

use crate::accumulator::{self, MergeMode};
use crate::config::CollectionConfig;
use crate::debounce::DebounceScheduler;
use crate::error::{ApiError, FetchError};
use crate::fetch::PageFetcher;
use crate::filter::{FilterField, FilterSet, FilterValue, PageQuery, Role};
use crate::page::Page;
use crate::types::{Generation, Identity, SentinelHandle};
use crate::visibility::{SentinelCallback, VisibilityTrigger};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A fetch the controller has committed to, tagged with its generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub mode: MergeMode,
    pub query: PageQuery,
}

struct Inner<T> {
    filters: FilterSet,
    state: CollectionState<T>,
}

struct Shared<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    inner: Mutex<Inner<T>>,
    debounce: DebounceScheduler,
    active: AtomicBool,
    page_size: u32,
    updates: watch::Sender<CollectionState<T>>,
}

/// Controller for one filtered, paginated collection
///
/// Cheap to clone; clones share the same state. Must be driven from within a tokio
/// runtime (debounced search and sentinel callbacks spawn tasks). The internal lock is
/// never held across an await.
pub struct CollectionController<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for CollectionController<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> CollectionController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a controller with the role's default filters. Nothing is fetched until
    /// the first reset.
    pub fn new(
        fetcher: Arc<dyn PageFetcher<T>>,
        config: &CollectionConfig,
        role: Role,
        identity: &Identity,
    ) -> Self {
        Self::with_filters(fetcher, config, FilterSet::create_default(role, identity))
    }

    /// Create a controller with prepared filters (e.g. restored from a URL).
    pub fn with_filters(
        fetcher: Arc<dyn PageFetcher<T>>,
        config: &CollectionConfig,
        filters: FilterSet,
    ) -> Self {
        let (updates, _) = watch::channel(CollectionState::empty());
        Self {
            shared: Arc::new(Shared {
                fetcher,
                inner: Mutex::new(Inner {
                    filters,
                    state: CollectionState::empty(),
                }),
                debounce: DebounceScheduler::new(config.debounce()),
                active: AtomicBool::new(true),
                page_size: config.page_size.max(1),
                updates,
            }),
        }
    }

    /// Read-only snapshot of the current state.
    pub fn state(&self) -> CollectionState<T> {
        self.shared.inner.lock().state.clone()
    }

    pub fn filters(&self) -> FilterSet {
        self.shared.inner.lock().filters.clone()
    }

    /// Receiver notified after every state mutation.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState<T>> {
        self.shared.updates.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Update the free-text search. The reset fetch is debounced: a burst of edits
    /// within the quiet period yields one fetch using the last text.
    ///
    /// Returns [`ApiError::ControllerClosed`] after [`Self::shutdown`].
    pub fn set_search(&self, text: impl Into<String>) -> Result<(), ApiError> {
        self.ensure_active()?;
        let text = text.into();
        debug!(search = %text, "Search text changed");
        self.shared.inner.lock().filters.set_search(text);

        let controller = self.clone();
        self.shared.debounce.schedule(async move {
            controller.reset_fetch().await;
        });
        Ok(())
    }

    /// Set a structured field and immediately reset the collection.
    ///
    /// Fails synchronously with [`ApiError::InvalidField`] for a locked or mistyped
    /// field; neither the filters nor the state change in that case.
    pub async fn set_field(
        &self,
        field: impl Into<FilterField>,
        value: impl Into<FilterValue>,
    ) -> Result<(), ApiError> {
        self.ensure_active()?;
        let field = field.into();
        self.shared.inner.lock().filters.update(field.clone(), value.into())?;
        debug!(field = %field, "Filter field changed");
        self.reset_fetch().await;
        Ok(())
    }

    /// Remove an unlocked structured field and reset the collection.
    pub async fn clear_field(&self, field: impl Into<FilterField>) -> Result<(), ApiError> {
        self.ensure_active()?;
        let field = field.into();
        self.shared.inner.lock().filters.clear(&field)?;
        debug!(field = %field, "Filter field cleared");
        self.reset_fetch().await;
        Ok(())
    }

    /// Clear search and unlocked fields (locked ones return to their seed) and reset.
    pub async fn reset_filters(&self) -> Result<(), ApiError> {
        self.ensure_active()?;
        self.shared.inner.lock().filters.reset();
        debug!("Filters reset to role defaults");
        self.reset_fetch().await;
        Ok(())
    }

    /// Explicit refresh with unchanged filters.
    pub async fn refresh(&self) {
        self.reset_fetch().await;
    }

    /// Run an external create/update/delete and resynchronize the list on success.
    pub async fn resync_after<F, R, E>(&self, mutation: F) -> Result<R, E>
    where
        F: Future<Output = Result<R, E>>,
    {
        let outcome = mutation.await;
        if outcome.is_ok() {
            self.refresh().await;
        }
        outcome
    }

    /// Issue a page-1 fetch under a new generation and apply it if still current.
    pub async fn reset_fetch(&self) {
        if let Some(ticket) = self.begin_reset() {
            self.run(ticket).await;
        }
    }

    /// Fetch and append the next page. Returns false when the guard refused: already
    /// loading, no more pages, or torn down.
    pub async fn continuation_fetch(&self) -> bool {
        match self.begin_continuation() {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Sentinel became visible: start a continuation fetch in the background if the
    /// guard allows it. Returns whether a fetch was issued.
    pub fn on_sentinel_visible(&self) -> bool {
        let Some(ticket) = self.begin_continuation() else {
            return false;
        };
        let controller = self.clone();
        tokio::spawn(async move {
            controller.run(ticket).await;
        });
        true
    }

    /// Wire a visibility trigger to [`Self::on_sentinel_visible`].
    ///
    /// The trigger holds only a weak reference, so it never keeps a torn-down view alive.
    pub fn attach_trigger(&self, trigger: &mut dyn VisibilityTrigger, sentinel: SentinelHandle) {
        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        let callback: SentinelCallback = Arc::new(move |_| {
            if let Some(shared) = weak.upgrade() {
                CollectionController { shared }.on_sentinel_visible();
            }
        });
        trigger.observe(sentinel, callback);
    }

    pub fn detach_trigger(&self, trigger: &mut dyn VisibilityTrigger) {
        trigger.unobserve();
    }

    /// Wait until no fetch is in flight and return the settled state.
    pub async fn settled(&self) -> CollectionState<T> {
        let mut updates = self.subscribe();
        let settled = updates.wait_for(|state| !state.is_loading()).await;
        match settled {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Tear down: pending debounced searches, in-flight responses and sentinel
    /// callbacks all become no-ops. Filter mutations return
    /// [`ApiError::ControllerClosed`] afterwards.
    pub fn shutdown(&self) {
        if self.shared.active.swap(false, Ordering::SeqCst) {
            self.shared.debounce.deactivate();
            info!("Collection controller shut down");
        }
    }

    /// Start a reset: bump the generation, raise `is_loading_initial`, and return the
    /// page-1 ticket. Supersedes any in-flight fetch, including a continuation.
    pub fn begin_reset(&self) -> Option<FetchTicket> {
        if !self.is_active() {
            return None;
        }
        // The immediate reset already carries the latest search text.
        self.shared.debounce.cancel();

        let mut inner = self.shared.inner.lock();
        let generation = inner.state.generation.next();
        let query = inner.filters.to_query(1, self.shared.page_size);
        let state = &mut inner.state;
        state.generation = generation;
        state.is_loading_initial = true;
        state.is_loading_more = false;
        state.page_number = 1;
        state.total_pages = 1;
        state.last_error = None;
        self.publish(&inner.state);

        info!(generation = %generation, "Reset fetch issued");
        Some(FetchTicket {
            generation,
            mode: MergeMode::Replace,
            query,
        })
    }

    /// Start a continuation if legal: nothing loading and `page_number < total_pages`.
    pub fn begin_continuation(&self) -> Option<FetchTicket> {
        if !self.is_active() {
            return None;
        }

        let mut inner = self.shared.inner.lock();
        let state = &inner.state;
        if state.is_loading_initial || state.is_loading_more || !state.has_more() {
            debug!(
                page = state.page_number,
                total_pages = state.total_pages,
                loading = state.is_loading(),
                "Continuation fetch not issued"
            );
            return None;
        }

        let generation = state.generation;
        let next_page = state.page_number + 1;
        let query = inner.filters.to_query(next_page, self.shared.page_size);
        inner.state.is_loading_more = true;
        self.publish(&inner.state);

        debug!(generation = %generation, page = next_page, "Continuation fetch issued");
        Some(FetchTicket {
            generation,
            mode: MergeMode::Append,
            query,
        })
    }

    /// Apply the outcome of `ticket`'s fetch. Returns whether the state changed; stale
    /// outcomes (successes and failures alike) are discarded silently.
    pub fn complete(&self, ticket: &FetchTicket, outcome: Result<Page<T>, FetchError>) -> bool {
        if !self.is_active() {
            return false;
        }

        let mut inner = self.shared.inner.lock();
        if !Self::is_current(&inner.state, ticket) {
            debug!(
                ticket_generation = %ticket.generation,
                current_generation = %inner.state.generation,
                page = ticket.query.page,
                stale = true,
                "Discarding superseded response"
            );
            return false;
        }

        let state = std::mem::take(&mut inner.state);
        inner.state = match outcome {
            Ok(page) => {
                let item_count = page.items.len();
                let mut next = accumulator::merge(state, page, ticket.mode);
                next.is_loading_initial = false;
                next.is_loading_more = false;
                next.last_error = None;
                info!(
                    generation = %ticket.generation,
                    page = next.page_number,
                    total_pages = next.total_pages,
                    item_count,
                    total_items = next.items.len(),
                    "Page applied"
                );
                next
            }
            Err(error) => {
                warn!(
                    generation = %ticket.generation,
                    page = ticket.query.page,
                    kind = ?error.kind(),
                    error = %error,
                    "Page fetch failed"
                );
                let mut next = state;
                match ticket.mode {
                    MergeMode::Replace => next.is_loading_initial = false,
                    MergeMode::Append => next.is_loading_more = false,
                }
                next.last_error = Some(error);
                next
            }
        };
        self.publish(&inner.state);
        true
    }

    async fn run(&self, ticket: FetchTicket) {
        let outcome = self.shared.fetcher.fetch_page(&ticket.query).await;
        self.complete(&ticket, outcome);
    }

    fn is_current(state: &CollectionState<T>, ticket: &FetchTicket) -> bool {
        if ticket.generation != state.generation {
            return false;
        }
        match ticket.mode {
            MergeMode::Replace => state.is_loading_initial,
            MergeMode::Append => {
                state.is_loading_more && ticket.query.page == state.page_number + 1
            }
        }
    }

    fn publish(&self, state: &CollectionState<T>) {
        self.shared.updates.send_replace(state.clone());
    }

    fn ensure_active(&self) -> Result<(), ApiError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ApiError::ControllerClosed)
        }
    }
}
