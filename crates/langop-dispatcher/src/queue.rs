use std::collections::HashSet;
use std::sync::Arc;

use langop_domain::ResourceKey;
use tokio::sync::{mpsc, Mutex};

/// A bounded, per-kind work queue with per-key in-flight dedup (§4.5, §5).
///
/// Enqueuing a key already pending (queued or currently being worked) is a
/// no-op: the engine always re-fetches the parent at the start of a
/// reconcile, so a duplicate enqueue observed between the first enqueue and
/// its dispatch carries no information the eventual reconcile won't already
/// see.
#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::Sender<ResourceKey>,
    rx: Arc<Mutex<mpsc::Receiver<ResourceKey>>>,
    pending: Arc<Mutex<HashSet<ResourceKey>>>,
}

impl WorkQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            pending: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Enqueue `key`, coalescing with an already-pending entry. Returns
    /// whether the key was newly enqueued.
    pub async fn enqueue(&self, key: ResourceKey) -> bool {
        let mut pending = self.pending.lock().await;
        if !pending.insert(key.clone()) {
            return false;
        }
        drop(pending);
        // The channel is sized to the same capacity the caller configured;
        // a full channel here means the in-flight set is already bounding
        // concurrency correctly and this send simply waits its turn.
        let _ = self.tx.send(key).await;
        true
    }

    /// Pull the next key a worker should process. Blocks until one is
    /// available or the queue is closed.
    pub async fn dequeue(&self) -> Option<ResourceKey> {
        self.rx.lock().await.recv().await
    }

    /// Mark `key` no longer in flight, allowing future enqueues to proceed.
    /// Call after a reconcile invocation completes, whether it succeeded,
    /// failed, or asked to requeue.
    pub async fn release(&self, key: &ResourceKey) {
        self.pending.lock().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_enqueue_while_pending_is_coalesced() {
        let queue = WorkQueue::new(8);
        let key = ResourceKey::new("default", "prod");

        assert!(queue.enqueue(key.clone()).await);
        assert!(!queue.enqueue(key.clone()).await);

        let dequeued = queue.dequeue().await.unwrap();
        assert_eq!(dequeued, key);
    }

    #[tokio::test]
    async fn releasing_allows_requeue() {
        let queue = WorkQueue::new(8);
        let key = ResourceKey::new("default", "prod");

        queue.enqueue(key.clone()).await;
        queue.dequeue().await;
        queue.release(&key).await;

        assert!(queue.enqueue(key.clone()).await);
    }

    #[tokio::test]
    async fn distinct_keys_never_coalesce() {
        let queue = WorkQueue::new(8);
        assert!(queue.enqueue(ResourceKey::new("default", "a")).await);
        assert!(queue.enqueue(ResourceKey::new("default", "b")).await);
    }
}
