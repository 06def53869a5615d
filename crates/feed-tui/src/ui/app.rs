use std::rc::Rc;

use feed_core::{FeedRuntime, PresenceRuntime, Reconciler};

/// Top-level UI state: the feed and presence runtimes plus loop control.
pub struct App {
    pub feed: FeedRuntime,
    pub presence: PresenceRuntime,
    pub should_quit: bool,
}

impl App {
    pub fn new(feed: FeedRuntime, presence: PresenceRuntime) -> Self {
        Self {
            feed,
            presence,
            should_quit: false,
        }
    }

    pub fn reconciler(&self) -> Rc<Reconciler> {
        self.feed.reconciler()
    }

    /// Drain both event pumps. Called from the tick arm of the event loop.
    pub fn pump(&mut self) {
        self.feed.pump();
        self.presence.pump();
    }
}
