use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;
use uuid::Uuid;

pub type SubscriberId = Uuid;

/// Receiving half handed to a connection task
pub struct Subscription {
    pub id: SubscriberId,
    pub receiver: mpsc::Receiver<Arc<str>>,
}

/// Outcome of a single fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Sinks that accepted the message
    pub delivered: usize,
    /// Open sinks whose buffer was full; the message was dropped for them
    pub dropped: usize,
    /// Sinks found closed and removed from the registry
    pub closed: usize,
}

/// Set of live-update sinks.
///
/// Delivery is best-effort: a closed sink is pruned, a full sink misses the
/// message, and neither affects delivery to anyone else.
pub struct SubscriberRegistry {
    sinks: DashMap<SubscriberId, mpsc::Sender<Arc<str>>>,
    buffer: usize,
}

impl SubscriberRegistry {
    /// `buffer` is the per-subscriber queue length (at least 1)
    pub fn new(buffer: usize) -> Self {
        Self {
            sinks: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Register a new sink with `initial` already queued as its first message
    pub fn register(&self, initial: Arc<str>) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        // Fresh channel with capacity >= 1, so the first send always fits
        let _ = tx.try_send(initial);

        let id = Uuid::new_v4();
        self.sinks.insert(id, tx);

        Subscription { id, receiver: rx }
    }

    /// Remove a sink. Returns false if it was already gone.
    pub fn unregister(&self, id: &SubscriberId) -> bool {
        self.sinks.remove(id).is_some()
    }

    /// Deliver `payload` to every open sink
    pub fn broadcast(&self, payload: &Arc<str>) -> PublishReport {
        let mut report = PublishReport::default();

        self.sinks.retain(|id, sink| {
            if sink.is_closed() {
                report.closed += 1;
                return false;
            }
            match sink.try_send(Arc::clone(payload)) {
                Ok(()) => {
                    report.delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    debug!(subscriber = %id, "Subscriber buffer full, dropping message");
                    report.dropped += 1;
                    true
                }
                Err(TrySendError::Closed(_)) => {
                    report.closed += 1;
                    false
                }
            }
        });

        report
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(64)
    }
}
