use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::config::CoreConfig;
use crate::models::Item;
use crate::pager::{BackwardPager, LoadOutcome};
use crate::store::FeedStore;
use crate::tracker::NewItemTracker;
use crate::transport::{HeadEvent, QueryExecutor};

/// Composition root over [`FeedStore`], [`BackwardPager`] and
/// [`NewItemTracker`] - the one contract the rendering layer consumes.
///
/// All mutation is single-threaded and event-driven: interior mutability via
/// `RefCell`/`Cell` instead of locks, since logically-concurrent mutation
/// *sources* (pagination vs. live updates) never actually run in parallel.
pub struct Reconciler {
    store: Rc<RefCell<FeedStore>>,
    pager: BackwardPager,
    tracker: RefCell<NewItemTracker>,
    initialized: Cell<bool>,
    sub_loading: Cell<bool>,
    sub_error: Cell<bool>,
}

impl Reconciler {
    pub fn new(executor: Arc<dyn QueryExecutor>, seed: Option<Item>, config: &CoreConfig) -> Self {
        let mut store = FeedStore::new();
        store.seed(seed);
        let store = Rc::new(RefCell::new(store));
        let pager = BackwardPager::new(executor, store.clone(), config.page_size);
        let tracker = RefCell::new(NewItemTracker::new(store.clone()));
        Self {
            store,
            pager,
            tracker,
            initialized: Cell::new(false),
            // The subscription has not delivered anything yet.
            sub_loading: Cell::new(true),
            sub_error: Cell::new(false),
        }
    }

    /// Fill the initial window with one backward page. Idempotent; the
    /// owner calls this once right after construction.
    pub async fn init(&self) {
        if self.initialized.replace(true) {
            return;
        }
        let _ = self.pager.load_older().await;
    }

    // ===== Read-only contract =====

    /// Snapshot of the visible window, newest first.
    pub fn items(&self) -> Vec<Item> {
        self.store.borrow().peek().to_vec()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more()
    }

    pub fn unseen_count(&self) -> u64 {
        self.tracker.borrow().unseen_count()
    }

    /// Whether the most recent completed "load older" attempt failed.
    /// Clears only when a later load succeeds.
    pub fn load_failed(&self) -> bool {
        self.pager.last_load_failed()
    }

    /// Whether the live subscription is still establishing.
    pub fn sub_loading(&self) -> bool {
        self.sub_loading.get()
    }

    /// Whether the live subscription reported an error.
    pub fn sub_error(&self) -> bool {
        self.sub_error.get()
    }

    // ===== Actions =====

    pub async fn load_older(&self) -> LoadOutcome {
        self.pager.load_older().await
    }

    /// Promote the tracked candidate to the window head. Returns whether a
    /// prepend actually happened.
    pub fn reveal_new(&self) -> bool {
        self.tracker.borrow_mut().reveal()
    }

    /// Feed one live-subscription payload into the tracker.
    pub fn on_head_event(&self, event: HeadEvent) {
        match event {
            HeadEvent::Loading => self.sub_loading.set(true),
            HeadEvent::Error => {
                self.sub_loading.set(false);
                self.sub_error.set(true);
            }
            HeadEvent::Data(newest) => {
                self.sub_loading.set(false);
                self.sub_error.set(false);
                self.tracker.borrow_mut().on_newest(newest);
            }
        }
    }
}
