//! Broadcast-channel progress publisher.
//!
//! Any number of subscribers (a dashboard socket, an event log, a test) can
//! follow a pass live. Publishing never blocks; with no subscribers the event
//! is dropped.

use quizbench_application::ports::progress::ProgressPublisher;
use quizbench_domain::ProgressEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<ProgressEvent>,
}

impl BroadcastPublisher {
    /// Create a publisher whose subscribers may lag by up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ProgressPublisher for BroadcastPublisher {
    fn publish(&self, event: &ProgressEvent) {
        if self.tx.send(event.clone()).is_err() {
            trace!("No progress subscribers for {}", event.kind());
        }
    }
}

/// Forward events from `rx` to `sink` until the channel closes.
///
/// Returns the number of events forwarded. Lagged events are skipped with a
/// warning.
pub async fn relay(
    mut rx: broadcast::Receiver<ProgressEvent>,
    sink: Arc<dyn ProgressPublisher>,
) -> usize {
    let mut forwarded = 0;
    loop {
        match rx.recv().await {
            Ok(event) => {
                sink.publish(&event);
                forwarded += 1;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Progress relay lagged, {} event(s) dropped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return forwarded,
        }
    }
}
