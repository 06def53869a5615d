use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::store::FeedStore;
use crate::transport::QueryExecutor;

/// Result of one [`BackwardPager::load_older`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Items were appended to the window; more history may remain.
    Appended(usize),
    /// This load made no progress; history is now exhausted.
    EndOfHistory,
    /// A load was already in flight; this call was coalesced into a no-op.
    AlreadyLoading,
    /// History was already exhausted before this call.
    Exhausted,
    /// The query failed. Exhaustion is untouched, so calling again retries.
    Failed,
}

/// Issues bounded backward-pagination queries, using the window's tail as the
/// exclusive cursor, and folds the results into [`FeedStore`].
///
/// Single-flight: a `load_older` arriving while one is outstanding is
/// ignored, never queued, so two logically-concurrent callers cannot race on
/// the cursor.
pub struct BackwardPager {
    executor: Arc<dyn QueryExecutor>,
    store: Rc<RefCell<FeedStore>>,
    page_size: usize,
    in_flight: Cell<bool>,
    exhausted: Cell<bool>,
    failed: Cell<bool>,
}

impl BackwardPager {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        store: Rc<RefCell<FeedStore>>,
        page_size: usize,
    ) -> Self {
        Self {
            executor,
            store,
            page_size,
            in_flight: Cell::new(false),
            // Optimistic until a load proves otherwise.
            exhausted: Cell::new(false),
            failed: Cell::new(false),
        }
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted.get()
    }

    /// Whether the most recent completed load attempt failed. Stays set
    /// while a retry is in flight and clears only when a load succeeds, so
    /// the error stays visible until recovery.
    pub fn last_load_failed(&self) -> bool {
        self.failed.get()
    }

    pub async fn load_older(&self) -> LoadOutcome {
        if self.exhausted.get() {
            return LoadOutcome::Exhausted;
        }
        if self.in_flight.get() {
            debug!("load_older coalesced, request already in flight");
            return LoadOutcome::AlreadyLoading;
        }
        self.in_flight.set(true);

        // The store borrow must not be held across the await.
        let before = self.store.borrow().tail_cursor();
        let result = self.executor.fetch_older(before, self.page_size).await;
        self.in_flight.set(false);

        match result {
            Ok(page) => {
                self.failed.set(false);
                if page.partial {
                    warn!(rows = page.rows.len(), "page arrived with partial network status");
                }
                let appended = self.store.borrow_mut().append_older(page.rows);
                if appended == 0 {
                    debug!(?before, "no older items, history exhausted");
                    self.exhausted.set(true);
                    LoadOutcome::EndOfHistory
                } else {
                    LoadOutcome::Appended(appended)
                }
            }
            Err(err) => {
                error!(%err, "backward page load failed");
                self.failed.set(true);
                LoadOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Item, ItemId};
    use crate::transport::{FeedPage, TransportError};
    use futures::future::BoxFuture;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn item(id: ItemId, created_at: u64) -> Item {
        Item {
            id,
            title: format!("item {}", id),
            created_at,
            author: Author {
                name: "someUser".to_string(),
            },
        }
    }

    fn page(ids: &[ItemId]) -> FeedPage {
        FeedPage {
            rows: ids.iter().map(|&id| item(id, id as u64 * 10)).collect(),
            partial: false,
        }
    }

    /// Serves scripted responses and counts queries.
    struct ScriptedExecutor {
        responses: Mutex<VecDeque<Result<FeedPage, TransportError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedExecutor {
        fn new(responses: Vec<Result<FeedPage, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl QueryExecutor for ScriptedExecutor {
        fn fetch_older(
            &self,
            _before: Option<ItemId>,
            _limit: usize,
        ) -> BoxFuture<'_, Result<FeedPage, TransportError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(FeedPage::default()));
            Box::pin(async move { response })
        }
    }

    /// Counts queries and holds every response until released.
    struct GatedExecutor {
        gate: Notify,
        calls: AtomicUsize,
    }

    impl QueryExecutor for GatedExecutor {
        fn fetch_older(
            &self,
            _before: Option<ItemId>,
            _limit: usize,
        ) -> BoxFuture<'_, Result<FeedPage, TransportError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                self.gate.notified().await;
                Ok(page(&[2, 1]))
            })
        }
    }

    fn new_pager(executor: Arc<dyn QueryExecutor>) -> (BackwardPager, Rc<RefCell<FeedStore>>) {
        let store = Rc::new(RefCell::new(FeedStore::new()));
        (BackwardPager::new(executor, store.clone(), 7), store)
    }

    #[tokio::test]
    async fn test_load_appends_and_advances_cursor() {
        let executor = ScriptedExecutor::new(vec![Ok(page(&[4, 3, 2, 1]))]);
        let (pager, store) = new_pager(executor.clone());

        assert_eq!(pager.load_older().await, LoadOutcome::Appended(4));
        assert_eq!(store.borrow().tail_cursor(), Some(1));
        assert!(pager.has_more());
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_sets_exhaustion_sticky() {
        let executor = ScriptedExecutor::new(vec![
            Ok(page(&[4, 3, 2, 1])),
            Ok(FeedPage::default()),
        ]);
        let (pager, _store) = new_pager(executor.clone());

        assert_eq!(pager.load_older().await, LoadOutcome::Appended(4));
        assert_eq!(pager.load_older().await, LoadOutcome::EndOfHistory);
        assert!(!pager.has_more());

        // Exhaustion is sticky: no further queries are issued.
        assert_eq!(pager.load_older().await, LoadOutcome::Exhausted);
        assert!(!pager.has_more());
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn test_single_flight_coalesces_concurrent_calls() {
        let executor = Arc::new(GatedExecutor {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let (pager, store) = new_pager(executor.clone());

        let (first, second, _) = tokio::join!(
            pager.load_older(),
            pager.load_older(),
            async {
                // Let both calls hit the guard before releasing the response.
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                executor.gate.notify_one();
            }
        );

        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, LoadOutcome::Appended(2));
        assert_eq!(second, LoadOutcome::AlreadyLoading);
        assert_eq!(store.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_surfaces_and_permits_retry() {
        let executor = ScriptedExecutor::new(vec![
            Err(TransportError::Query {
                message: "boom".to_string(),
            }),
            Ok(page(&[2, 1])),
        ]);
        let (pager, _store) = new_pager(executor.clone());

        assert_eq!(pager.load_older().await, LoadOutcome::Failed);
        assert!(pager.last_load_failed());
        assert!(pager.has_more());

        // Retrying clears the failure flag and succeeds.
        assert_eq!(pager.load_older().await, LoadOutcome::Appended(2));
        assert!(!pager.last_load_failed());
    }

    /// Fails the first query, then gates the second until released.
    struct FlakyGatedExecutor {
        gate: Notify,
        calls: AtomicUsize,
    }

    impl QueryExecutor for FlakyGatedExecutor {
        fn fetch_older(
            &self,
            _before: Option<ItemId>,
            _limit: usize,
        ) -> BoxFuture<'_, Result<FeedPage, TransportError>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if call == 0 {
                    return Err(TransportError::Query {
                        message: "boom".to_string(),
                    });
                }
                self.gate.notified().await;
                Ok(page(&[2, 1]))
            })
        }
    }

    #[tokio::test]
    async fn test_failure_stays_visible_while_retry_in_flight() {
        let executor = Arc::new(FlakyGatedExecutor {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let (pager, _store) = new_pager(executor.clone());

        assert_eq!(pager.load_older().await, LoadOutcome::Failed);
        assert!(pager.last_load_failed());

        let (outcome, _) = tokio::join!(
            pager.load_older(),
            async {
                tokio::task::yield_now().await;
                // The retry is awaiting its response; the failure must
                // still be visible to the rendering layer.
                assert!(pager.last_load_failed());
                executor.gate.notify_one();
            }
        );

        assert_eq!(outcome, LoadOutcome::Appended(2));
        assert!(!pager.last_load_failed());
    }

    #[tokio::test]
    async fn test_partial_page_still_folded() {
        let mut partial = page(&[3, 2]);
        partial.partial = true;
        let executor = ScriptedExecutor::new(vec![Ok(partial)]);
        let (pager, store) = new_pager(executor);

        assert_eq!(pager.load_older().await, LoadOutcome::Appended(2));
        assert_eq!(store.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_page_exhausts() {
        let executor = ScriptedExecutor::new(vec![
            Ok(page(&[5, 4])),
            // Stale page repeating the current tail: no progress possible.
            Ok(page(&[4, 3])),
        ]);
        let (pager, store) = new_pager(executor);

        assert_eq!(pager.load_older().await, LoadOutcome::Appended(2));
        assert_eq!(pager.load_older().await, LoadOutcome::EndOfHistory);
        assert!(!pager.has_more());
        assert_eq!(store.borrow().len(), 2);
    }
}
