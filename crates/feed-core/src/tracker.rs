use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::models::Item;
use crate::store::FeedStore;

/// Tracks items known to exist upstream that the viewer has not revealed yet.
///
/// The live subscription reports only the single newest item, not every
/// intermediate arrival, so `unseen` counts distinct newest-item
/// notifications since the last reveal. That upper-approximates the true
/// unseen count: items that were never the newest at a sampling instant are
/// neither counted individually nor inserted on reveal.
pub struct NewItemTracker {
    store: Rc<RefCell<FeedStore>>,
    unseen: u64,
    candidate: Option<Item>,
}

impl NewItemTracker {
    pub fn new(store: Rc<RefCell<FeedStore>>) -> Self {
        Self {
            store,
            unseen: 0,
            candidate: None,
        }
    }

    pub fn unseen_count(&self) -> u64 {
        self.unseen
    }

    pub fn candidate(&self) -> Option<&Item> {
        self.candidate.as_ref()
    }

    /// Handle one steady-state subscription payload.
    pub fn on_newest(&mut self, newest: Option<Item>) {
        let Some(item) = newest else {
            return;
        };
        // Stream echoing what we already show, e.g. right after a reveal or
        // on initial subscribe.
        if self.store.borrow().head_id() == Some(item.id) {
            return;
        }
        if self.candidate.as_ref().map(|c| c.id) == Some(item.id) {
            return;
        }
        self.unseen += 1;
        debug!(id = item.id, unseen = self.unseen, "new head candidate");
        self.candidate = Some(item);
    }

    /// Fold the candidate head into the window and reset the counter.
    /// Returns whether a prepend actually happened; a stale candidate is
    /// consumed but skipped by the store.
    pub fn reveal(&mut self) -> bool {
        let Some(item) = self.candidate.take() else {
            return false;
        };
        self.unseen = 0;
        self.store.borrow_mut().reveal_head(item)
    }
}
