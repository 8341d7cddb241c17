//! Debounced list fetching for server-side tables.
//!
//! [`ListController`] watches a [`FilterManager`](crate::filter::FilterManager)
//! channel. Once the state has been quiet for the debounce window it pushes a
//! history entry and fetches the matching page. A newer fetch cancels the one
//! in flight, and a response whose generation is no longer current is
//! dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use catalog_core::listing::ListMeta;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::AdminError;
use crate::filter::manager::push_history;
use crate::filter::{FilterSchema, FilterState, History};
use crate::http::{QueryParams, ResourceClient};
use crate::models::ListResponse;

/// Message shown when a list cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Unable to load the list.";

/// Where a table gets its rows from.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    /// Fetch one page. Implementations should return
    /// [`AdminError::Cancelled`] promptly once `cancel` fires.
    async fn fetch(
        &self,
        params: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<ListResponse<T>, AdminError>;
}

#[async_trait]
impl<T> ListSource<T> for ResourceClient<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(
        &self,
        params: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<ListResponse<T>, AdminError> {
        self.list_cancellable(params, cancel).await
    }
}

/// User-facing error notifications (toasts).
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// [`Notifier`] that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(message, "Notification");
    }
}

/// What the table renders.
#[derive(Debug, Clone)]
pub struct TableSnapshot<T> {
    pub rows: Vec<T>,
    pub total: i64,
    pub meta: Option<ListMeta>,
    pub loading: bool,
}

impl<T> Default for TableSnapshot<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
            meta: None,
            loading: false,
        }
    }
}

pub struct ListController<T> {
    source: Arc<dyn ListSource<T>>,
    notifier: Arc<dyn Notifier>,
    history: Arc<dyn History>,
    schema: Arc<FilterSchema>,
    debounce: Duration,
    snapshot: Arc<watch::Sender<TableSnapshot<T>>>,
    generation: Arc<AtomicU64>,
}

impl<T: Send + Sync + 'static> ListController<T> {
    pub fn new(
        source: Arc<dyn ListSource<T>>,
        notifier: Arc<dyn Notifier>,
        history: Arc<dyn History>,
        schema: Arc<FilterSchema>,
        debounce: Duration,
    ) -> Self {
        let (snapshot, _) = watch::channel(TableSnapshot::default());
        Self {
            source,
            notifier,
            history,
            schema,
            debounce,
            snapshot: Arc::new(snapshot),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Follow what the table should render.
    pub fn snapshot(&self) -> watch::Receiver<TableSnapshot<T>> {
        self.snapshot.subscribe()
    }

    pub fn spawn(
        self,
        states: watch::Receiver<FilterState>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(states, shutdown))
    }

    /// Fetch the initial state immediately, then once per settled change,
    /// until `shutdown` fires or the manager is dropped.
    pub async fn run(self, mut states: watch::Receiver<FilterState>, shutdown: CancellationToken) {
        let mut settled = states.borrow_and_update().clone();
        let mut in_flight = self.settle(&settled, None);

        'changes: loop {
            tokio::select! {
                _ = shutdown.cancelled() => break 'changes,
                changed = states.changed() => {
                    if changed.is_err() {
                        break 'changes;
                    }
                }
            }

            // Restart the window on every change until it stays quiet.
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break 'changes,
                    changed = states.changed() => {
                        if changed.is_err() {
                            break 'changes;
                        }
                        tracing::trace!("Debounce window restarted");
                    }
                    _ = tokio::time::sleep(self.debounce) => break,
                }
            }

            let next = states.borrow_and_update().clone();
            if next == settled {
                tracing::trace!("Debounced state unchanged, skipping fetch");
                continue;
            }
            settled = next;
            in_flight = self.settle(&settled, Some(in_flight));
        }

        in_flight.cancel();
        tracing::debug!("List controller stopped");
    }

    /// Record `state` in history and start its fetch, cancelling `previous`.
    fn settle(&self, state: &FilterState, previous: Option<CancellationToken>) -> CancellationToken {
        if let Some(previous) = previous {
            if !previous.is_cancelled() {
                tracing::debug!("Cancelling superseded list request");
                previous.cancel();
            }
        }
        push_history(&*self.history, &self.schema, state);
        self.start_fetch(self.schema.request_params(state))
    }

    fn start_fetch(&self, params: QueryParams) -> CancellationToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();

        let source = Arc::clone(&self.source);
        let notifier = Arc::clone(&self.notifier);
        let snapshot = Arc::clone(&self.snapshot);
        let current = Arc::clone(&self.generation);
        let token = cancel.clone();

        snapshot.send_modify(|s| s.loading = true);
        tokio::spawn(async move {
            let result = source.fetch(&params, &token).await;
            if current.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "Discarding stale list response");
                return;
            }
            match result {
                Ok(response) => snapshot.send_modify(|s| {
                    s.total = response.meta.total;
                    s.meta = Some(response.meta);
                    s.rows = response.data;
                    s.loading = false;
                }),
                Err(AdminError::Cancelled) => {
                    tracing::debug!(generation, "List request cancelled");
                }
                Err(error) => {
                    tracing::error!(error = %error, "Failed to load list");
                    notifier.error(LOAD_FAILED_MESSAGE);
                    snapshot.send_modify(|s| s.loading = false);
                }
            }
        });

        cancel
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use catalog_core::listing::PageRequest;

    use super::*;
    use crate::filter::{Column, FilterManager, MemoryHistory};

    const DEBOUNCE: Duration = Duration::from_millis(300);

    /// Scripted source: records every request, answers after `delay`.
    struct FakeSource {
        calls: Mutex<Vec<QueryParams>>,
        delay: Duration,
        fail: bool,
        honour_cancel: bool,
    }

    impl FakeSource {
        fn new(delay: Duration) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                delay,
                fail: false,
                honour_cancel: true,
            }
        }

        fn calls(&self) -> Vec<QueryParams> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[async_trait]
    impl ListSource<String> for FakeSource {
        async fn fetch(
            &self,
            params: &[(String, String)],
            cancel: &CancellationToken,
        ) -> Result<ListResponse<String>, AdminError> {
            let params = params.to_vec();
            self.calls.lock().unwrap().push(params.clone());

            if self.honour_cancel {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(AdminError::Cancelled),
                    _ = tokio::time::sleep(self.delay) => {}
                }
            } else {
                tokio::time::sleep(self.delay).await;
            }

            if self.fail {
                return Err(AdminError::Api {
                    status: 500,
                    body: "boom".into(),
                });
            }
            let label = param(&params, "search").unwrap_or("").to_string();
            Ok(ListResponse {
                data: vec![label],
                meta: ListMeta::new(&PageRequest::new(Some(1), Some(15), 15, 100), 1, 1),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    struct Harness {
        manager: FilterManager,
        history: Arc<MemoryHistory>,
        notifier: Arc<RecordingNotifier>,
        snapshot: watch::Receiver<TableSnapshot<String>>,
        shutdown: CancellationToken,
    }

    fn harness(source: Arc<FakeSource>) -> Harness {
        let schema = Arc::new(FilterSchema::new(
            &[Column::sortable("name", "Name")],
            15,
            &[15, 25, 50],
            &[],
        ));
        let history = Arc::new(MemoryHistory::at("/categories", ""));
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = FilterManager::new(schema.clone(), history.clone());
        manager.replace_history();

        let controller = ListController::new(
            source,
            notifier.clone(),
            history.clone(),
            schema,
            DEBOUNCE,
        );
        let snapshot = controller.snapshot();
        let shutdown = CancellationToken::new();
        controller.spawn(manager.subscribe(), shutdown.clone());

        Harness {
            manager,
            history,
            notifier,
            snapshot,
            shutdown,
        }
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_initial_state_immediately() {
        let source = Arc::new(FakeSource::new(Duration::from_millis(10)));
        let h = harness(source.clone());

        advance(20).await;
        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(param(&calls[0], "page"), Some("1"));
        assert_eq!(param(&calls[0], "per_page"), Some("15"));
        assert_eq!(h.snapshot.borrow().total, 1);
        assert!(!h.snapshot.borrow().loading);
        // Initial state equals the replaced entry, so nothing was pushed.
        assert_eq!(h.history.entries().len(), 1);
        h.shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_changes_collapse_into_one_fetch() {
        let source = Arc::new(FakeSource::new(Duration::from_millis(10)));
        let mut h = harness(source.clone());
        advance(20).await;

        h.manager.change_search("a");
        advance(100).await;
        h.manager.change_search("al");
        advance(100).await;
        h.manager.change_search("alien");
        advance(DEBOUNCE.as_millis() as u64 + 50).await;

        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(param(&calls[1], "search"), Some("alien"));
        assert_eq!(h.snapshot.borrow().rows, vec!["alien".to_string()]);
        assert_eq!(h.history.location().search, "search=alien");
        h.shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn newer_fetch_cancels_the_one_in_flight() {
        let source = Arc::new(FakeSource::new(Duration::from_millis(1_000)));
        let mut h = harness(source.clone());
        advance(10).await;

        h.manager.change_search("second");
        advance(DEBOUNCE.as_millis() as u64 + 1_100).await;

        assert_eq!(source.calls().len(), 2);
        assert_eq!(h.snapshot.borrow().rows, vec!["second".to_string()]);
        assert!(h.notifier.messages.lock().unwrap().is_empty());
        h.shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn stale_responses_are_discarded() {
        let mut fake = FakeSource::new(Duration::from_millis(1_000));
        fake.honour_cancel = false;
        let source = Arc::new(fake);
        let mut h = harness(source.clone());
        advance(10).await;

        h.manager.change_search("fresh");
        advance(DEBOUNCE.as_millis() as u64 + 900).await;
        // The initial request answered at ~1000ms after being superseded.
        assert!(h.snapshot.borrow().rows.is_empty());
        assert!(h.snapshot.borrow().loading);

        advance(200).await;
        assert_eq!(h.snapshot.borrow().rows, vec!["fresh".to_string()]);
        h.shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn failures_notify_once_and_stop_loading() {
        let mut fake = FakeSource::new(Duration::from_millis(10));
        fake.fail = true;
        let h = harness(Arc::new(fake));

        advance(50).await;
        assert_eq!(
            *h.notifier.messages.lock().unwrap(),
            vec![LOAD_FAILED_MESSAGE.to_string()]
        );
        assert!(!h.snapshot.borrow().loading);
        h.shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn returning_to_the_settled_state_skips_the_fetch() {
        let source = Arc::new(FakeSource::new(Duration::from_millis(10)));
        let mut h = harness(source.clone());
        advance(20).await;

        h.manager.change_search("x");
        advance(50).await;
        h.manager.change_search("");
        advance(DEBOUNCE.as_millis() as u64 + 50).await;

        assert_eq!(source.calls().len(), 1);
        h.shutdown.cancel();
    }
}
