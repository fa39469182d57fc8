//! src/registry.rs
//!
//! Tracks currently-connected push observers and fans serialized telemetry
//! out to all of them. Each observer gets its own bounded mpsc outbox, which
//! keeps delivery FIFO per observer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Duration, timeout};
use tracing::{debug, info, warn};

/// Default size for each observer's outbox.
const DEFAULT_BUFFER_SIZE: usize = 32;

/// Upper bound on a single observer send. A stalled peer counts as a failed
/// send and is disconnected rather than stalling the whole fan-out.
const SEND_DEADLINE: Duration = Duration::from_millis(250);

/// Opaque handle identifying one connected observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// Registry of connected observers. Membership mutates under the lock;
/// `broadcast` iterates a point-in-time snapshot of it, so subscribes and
/// unsubscribes racing an in-flight fan-out are safe.
#[derive(Clone)]
pub struct ObserverRegistry {
    observers: Arc<Mutex<Vec<(ObserverId, mpsc::Sender<String>)>>>,
    next_id: Arc<AtomicU64>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            observers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Registers a new observer and returns its handle plus the receiving end
    /// of its outbox. Always succeeds.
    pub async fn subscribe(
        &self,
        buffer_size: Option<usize>,
    ) -> (ObserverId, mpsc::Receiver<String>) {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(size);
        self.observers.lock().await.push((id, tx));
        (id, rx)
    }

    /// Removes an observer. Idempotent: an unknown handle is a no-op.
    pub async fn unsubscribe(&self, id: ObserverId) {
        self.observers.lock().await.retain(|(other, _)| *other != id);
    }

    pub async fn observer_count(&self) -> usize {
        self.observers.lock().await.len()
    }

    /// Sends `payload` to every currently-registered observer. A failed send
    /// (receiver gone, or the deadline elapsing against a full outbox) never
    /// aborts delivery to the remaining observers; the failed observer is
    /// unsubscribed instead.
    pub async fn broadcast(&self, payload: &str) {
        let targets = {
            let observers = self.observers.lock().await;
            observers.clone()
        };

        let mut failed: Vec<ObserverId> = Vec::new();
        for (id, tx) in targets {
            match timeout(SEND_DEADLINE, tx.send(payload.to_string())).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => {
                    debug!("{id} receiver dropped; unsubscribing");
                    failed.push(id);
                }
                Err(_) => {
                    warn!("{id} send deadline exceeded; unsubscribing");
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let mut observers = self.observers.lock().await;
            observers.retain(|(id, _)| !failed.contains(id));
            info!("removed {} dead observer(s) during broadcast", failed.len());
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
