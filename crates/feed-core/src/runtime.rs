use std::rc::Rc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::reconciler::Reconciler;
use crate::transport::HeadEvent;

/// Pumps the live "newest item" subscription into a [`Reconciler`].
///
/// A spawned forwarder moves stream events into a channel; the owner drains
/// the channel from its own tick via [`FeedRuntime::pump`], so every store
/// mutation stays on the owner's thread. Shutdown aborts the forwarder and
/// closes the channel - an event delivered after teardown never touches the
/// store.
pub struct FeedRuntime {
    reconciler: Rc<Reconciler>,
    event_rx: mpsc::UnboundedReceiver<HeadEvent>,
    forwarder: Option<JoinHandle<()>>,
}

impl FeedRuntime {
    pub fn new(reconciler: Rc<Reconciler>, events: BoxStream<'static, HeadEvent>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let forwarder = tokio::spawn(async move {
            let mut events = events;
            while let Some(event) = events.next().await {
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            debug!("head subscription ended");
        });
        Self {
            reconciler,
            event_rx,
            forwarder: Some(forwarder),
        }
    }

    pub fn reconciler(&self) -> Rc<Reconciler> {
        self.reconciler.clone()
    }

    /// Drain pending subscription events into the reconciler. Returns the
    /// number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.reconciler.on_head_event(event);
            applied += 1;
        }
        applied
    }

    /// Tear the subscription down. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.forwarder.take() {
            handle.abort();
        }
        self.event_rx.close();
    }
}

impl Drop for FeedRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
