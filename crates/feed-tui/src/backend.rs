//! In-process demo backend: an append-only item log plus simulated
//! producers, standing in for the real query/subscription transport.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use feed_core::{
    Author, FeedPage, HeadEvent, Item, ItemId, OnlineUser, PresenceClient, QueryExecutor,
    RosterEvent, SubscriptionEvent, TransportError,
};
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

/// Seconds after which a user without a heartbeat drops off the roster.
const ONLINE_WINDOW_SECS: u64 = 60;

/// Name the viewer appears under in the roster.
pub const VIEWER_NAME: &str = "you";

const PRODUCER_NAMES: &[&str] = &["someUser1", "someUser2", "someUser3"];

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

struct BackendState {
    /// Oldest-first append-only log; ids ascend with recency.
    items: Vec<Item>,
    next_id: ItemId,
    last_seen: BTreeMap<String, u64>,
}

impl BackendState {
    fn roster(&self, now: u64) -> Vec<OnlineUser> {
        self.last_seen
            .iter()
            .filter(|(_, &seen)| now.saturating_sub(seen) < ONLINE_WINDOW_SECS)
            .map(|(name, _)| OnlineUser {
                id: name.clone(),
                user_name: name.clone(),
            })
            .collect()
    }
}

/// Shared handle to the demo backend. Cheap to clone.
#[derive(Clone)]
pub struct LocalBackend {
    state: Arc<Mutex<BackendState>>,
    head_tx: broadcast::Sender<HeadEvent>,
    roster_tx: broadcast::Sender<RosterEvent>,
}

impl LocalBackend {
    /// Create a backend pre-populated with `history` items, one per second
    /// into the past.
    pub fn new(history: usize) -> Self {
        let now = unix_now();
        let items: Vec<Item> = (0..history)
            .map(|n| Item {
                id: (n + 1) as ItemId,
                title: format!("This is public item {}", n + 1),
                created_at: now - (history - n) as u64,
                author: Author {
                    name: PRODUCER_NAMES[n % PRODUCER_NAMES.len()].to_string(),
                },
            })
            .collect();
        let next_id = items.len() as ItemId + 1;
        let (head_tx, _) = broadcast::channel(64);
        let (roster_tx, _) = broadcast::channel(64);
        Self {
            state: Arc::new(Mutex::new(BackendState {
                items,
                next_id,
                last_seen: BTreeMap::new(),
            })),
            head_tx,
            roster_tx,
        }
    }

    /// Newest item currently in the log, used to seed the window at mount.
    pub fn newest(&self) -> Option<Item> {
        self.state.lock().items.last().cloned()
    }

    /// Append one simulated item and notify subscribers of the new head.
    pub fn produce(&self, author: &str) -> Item {
        let now = unix_now();
        let item = {
            let mut state = self.state.lock();
            let item = Item {
                id: state.next_id,
                title: format!("This is public item {}", state.next_id),
                created_at: now,
                author: Author {
                    name: author.to_string(),
                },
            };
            state.next_id += 1;
            state.items.push(item.clone());
            state.last_seen.insert(author.to_string(), now);
            item
        };
        debug!(id = item.id, author, "produced item");
        let _ = self.head_tx.send(HeadEvent::Data(Some(item.clone())));
        self.broadcast_roster(now);
        item
    }

    /// Spawn a task appending one item per `cadence`, cycling through the
    /// simulated producer names.
    pub fn spawn_producer(&self, cadence: Duration) -> JoinHandle<()> {
        let backend = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cadence);
            ticker.tick().await;
            let mut turn = 0usize;
            loop {
                ticker.tick().await;
                backend.produce(PRODUCER_NAMES[turn % PRODUCER_NAMES.len()]);
                turn += 1;
            }
        })
    }

    /// Live "newest public item" subscription. Opens with the upstream
    /// `{loading, data}` handshake before streaming head changes.
    pub fn subscribe_head(&self) -> BoxStream<'static, HeadEvent> {
        let mut rx = self.head_tx.subscribe();
        let newest = self.newest();
        Box::pin(async_stream::stream! {
            yield HeadEvent::Loading;
            yield HeadEvent::Data(newest);
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "head subscription lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn broadcast_roster(&self, now: u64) {
        let roster = self.state.lock().roster(now);
        let _ = self.roster_tx.send(SubscriptionEvent::Data(roster));
    }
}

impl QueryExecutor for LocalBackend {
    fn fetch_older(
        &self,
        before: Option<ItemId>,
        limit: usize,
    ) -> BoxFuture<'_, Result<FeedPage, TransportError>> {
        let rows: Vec<Item> = {
            let state = self.state.lock();
            state
                .items
                .iter()
                .rev()
                .filter(|item| before.map_or(true, |cursor| item.id < cursor))
                .take(limit)
                .cloned()
                .collect()
        };
        Box::pin(async move {
            // Simulated round trip.
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(FeedPage {
                rows,
                partial: false,
            })
        })
    }
}

impl PresenceClient for LocalBackend {
    fn set_last_seen(&self, now: u64) -> BoxFuture<'_, Result<u64, TransportError>> {
        let changed = {
            let mut state = self.state.lock();
            state.last_seen.insert(VIEWER_NAME.to_string(), now);
            1
        };
        self.broadcast_roster(now);
        Box::pin(async move { Ok(changed) })
    }

    fn subscribe_online(&self) -> BoxStream<'static, RosterEvent> {
        let mut rx = self.roster_tx.subscribe();
        let initial = self.state.lock().roster(unix_now());
        Box::pin(async_stream::stream! {
            yield RosterEvent::Loading;
            yield RosterEvent::Data(initial);
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
