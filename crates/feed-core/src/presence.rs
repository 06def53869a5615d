use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::OnlineUser;
use crate::transport::{PresenceClient, RosterEvent, SubscriptionEvent};

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Online-presence glue: a periodic "I am here" heartbeat plus a live roster
/// of currently-online users.
///
/// Both long-lived effects are scoped to this value's lifetime: started on
/// construction, cancelled on shutdown/drop. Each heartbeat tick is
/// independent and idempotent, so there is no overlap enforcement - a failed
/// tick is logged and the next one proceeds normally.
pub struct PresenceRuntime {
    roster: Vec<OnlineUser>,
    loading: bool,
    error: bool,
    roster_rx: mpsc::UnboundedReceiver<RosterEvent>,
    heartbeat: Option<JoinHandle<()>>,
    forwarder: Option<JoinHandle<()>>,
}

impl PresenceRuntime {
    pub fn start(client: Arc<dyn PresenceClient>, heartbeat_interval: Duration) -> Self {
        let heartbeat_client = client.clone();
        let heartbeat = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(heartbeat_interval);
            // The first interval tick fires immediately; consume it so beats
            // start one full interval after mount, like the original timer.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(err) = heartbeat_client.set_last_seen(unix_now()).await {
                    warn!(%err, "heartbeat mutation failed");
                }
            }
        });

        let (roster_tx, roster_rx) = mpsc::unbounded_channel();
        let mut events = client.subscribe_online();
        let forwarder = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if roster_tx.send(event).is_err() {
                    break;
                }
            }
            debug!("online-users subscription ended");
        });

        Self {
            roster: Vec::new(),
            loading: true,
            error: false,
            roster_rx,
            heartbeat: Some(heartbeat),
            forwarder: Some(forwarder),
        }
    }

    /// Latest roster snapshot, name-ordered upstream.
    pub fn roster(&self) -> &[OnlineUser] {
        &self.roster
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> bool {
        self.error
    }

    /// Drain pending roster events. Returns the number applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.roster_rx.try_recv() {
            match event {
                SubscriptionEvent::Loading => self.loading = true,
                SubscriptionEvent::Error => {
                    self.loading = false;
                    self.error = true;
                }
                SubscriptionEvent::Data(roster) => {
                    self.loading = false;
                    self.error = false;
                    self.roster = roster;
                }
            }
            applied += 1;
        }
        applied
    }

    /// Stop the heartbeat and the roster subscription. Idempotent; also runs
    /// on drop.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.heartbeat.take() {
            handle.abort();
        }
        if let Some(handle) = self.forwarder.take() {
            handle.abort();
        }
        self.roster_rx.close();
    }
}

impl Drop for PresenceRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
