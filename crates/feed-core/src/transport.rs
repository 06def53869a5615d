//! Seams toward the query/subscription transport. The core never talks to a
//! network directly; it consumes these traits and the event envelopes below.

use crate::models::{Item, ItemId, OnlineUser};
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("query failed: {message}")]
    Query { message: String },
    #[error("subscription failed: {message}")]
    Subscription { message: String },
}

/// One backward page of feed rows, newest first.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub rows: Vec<Item>,
    /// Set when the response carried a non-clean network status (partial or
    /// stale cache data). The rows are still usable.
    pub partial: bool,
}

/// Executes parameterized feed queries against the backend.
pub trait QueryExecutor {
    /// Fetch up to `limit` items strictly older than `before`, newest first
    /// within the page. `before: None` means "starting from the newest".
    fn fetch_older(
        &self,
        before: Option<ItemId>,
        limit: usize,
    ) -> BoxFuture<'_, Result<FeedPage, TransportError>>;
}

/// One payload from a live subscription, mirroring the upstream
/// `{loading, error, data}` envelope. `Loading` and `Error` are observable
/// states of their own, distinct from steady-state data.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEvent<T> {
    Loading,
    Error,
    Data(T),
}

/// Payload of the "newest public item" subscription: the single most recent
/// item upstream knows about, not a diff.
pub type HeadEvent = SubscriptionEvent<Option<Item>>;

/// Payload of the online-users subscription.
pub type RosterEvent = SubscriptionEvent<Vec<OnlineUser>>;

/// Backend handle for the presence collaborator.
pub trait PresenceClient: Send + Sync {
    /// Record the viewer as seen at `now` (unix seconds). Each call is
    /// independent and idempotent.
    fn set_last_seen(&self, now: u64) -> BoxFuture<'_, Result<u64, TransportError>>;

    /// Live roster of currently-online users, name-ordered upstream.
    fn subscribe_online(&self) -> BoxStream<'static, RosterEvent>;
}
