//! Test fetchers.

use async_trait::async_trait;
use pagewise::fetch::PageFetcher;
use pagewise::{CollectionController, FetchError, Identity, Page, PageQuery, Role};
use pagewise::config::CollectionConfig;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};

pub type Reply = Result<Page<String>, FetchError>;

pub fn page(items: &[&str], number: u32, total_pages: u32, total_count: u64) -> Page<String> {
    Page::new(
        items.iter().map(|s| s.to_string()).collect(),
        number,
        total_pages,
        total_count,
    )
}

pub fn controller(
    fetcher: Arc<dyn PageFetcher<String>>,
    role: Role,
    identity: &str,
) -> CollectionController<String> {
    CollectionController::new(
        fetcher,
        &CollectionConfig::default(),
        role,
        &Identity::new(identity),
    )
}

/// Answers each call immediately with the next scripted reply.
pub struct ScriptedFetcher {
    queries: Mutex<Vec<PageQuery>>,
    script: Mutex<VecDeque<Reply>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
        })
    }

    pub fn queries(&self) -> Vec<PageQuery> {
        self.queries.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl PageFetcher<String> for ScriptedFetcher {
    async fn fetch_page(&self, query: &PageQuery) -> Reply {
        self.queries.lock().push(query.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("script exhausted".into())))
    }
}

struct PendingCall {
    query: PageQuery,
    reply: Option<oneshot::Sender<Reply>>,
}

/// Holds every call open until the test answers it, so responses can be delivered
/// in any order.
#[derive(Default)]
pub struct GatedFetcher {
    calls: Mutex<Vec<PendingCall>>,
    arrived: Notify,
}

impl GatedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn query(&self, index: usize) -> PageQuery {
        self.calls.lock()[index].query.clone()
    }

    /// Wait until at least `count` calls have been issued.
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let arrived = self.arrived.notified();
            if self.call_count() >= count {
                return;
            }
            arrived.await;
        }
    }

    /// Answer call `index`. Panics if it was already answered.
    pub fn respond(&self, index: usize, reply: Reply) {
        let sender = self.calls.lock()[index]
            .reply
            .take()
            .expect("call already answered");
        let _ = sender.send(reply);
    }
}

#[async_trait]
impl PageFetcher<String> for GatedFetcher {
    async fn fetch_page(&self, query: &PageQuery) -> Reply {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(PendingCall {
            query: query.clone(),
            reply: Some(tx),
        });
        self.arrived.notify_waiters();
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("call abandoned".into())))
    }
}
