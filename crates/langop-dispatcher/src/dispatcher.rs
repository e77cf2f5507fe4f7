use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use langop_cache::CapabilityCache;
use langop_client::{OrchestratorClient, WatchEvent};
use langop_domain::{Kind, QueueKey, ResourceKey};
use langop_graph::ClusterIndex;
use langop_reconciler::{reconcile_agent, reconcile_cluster, reconcile_persona, reconcile_tool, ReconcileError, ReconcileOutcome};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use crate::backoff::Backoff;
use crate::queue::WorkQueue;
use crate::router::route_watch_event;

const PARENT_KINDS: [Kind; 4] = [Kind::Cluster, Kind::Tool, Kind::Agent, Kind::Persona];

/// Per-kind worker pool size and queue depth (§4.5, §6.4).
#[derive(Debug, Clone, Copy)]
pub struct KindConfig {
    pub concurrency: usize,
    pub queue_capacity: usize,
}

impl Default for KindConfig {
    fn default() -> Self {
        Self { concurrency: 2, queue_capacity: 256 }
    }
}

/// Owns one bounded work queue per parent kind and the worker pool draining
/// it, plus the Cluster→dependents index used to fan a Cluster change out to
/// every Tool/Agent that references it (§4.5, §5).
pub struct Dispatcher {
    queues: HashMap<Kind, WorkQueue>,
    cluster_index: Arc<RwLock<ClusterIndex>>,
    cancellation: CancellationToken,
}

impl Dispatcher {
    pub fn new(configs: &HashMap<Kind, KindConfig>, cluster_index: ClusterIndex) -> Self {
        let mut queues = HashMap::new();
        for kind in PARENT_KINDS {
            let config = configs.get(&kind).copied().unwrap_or_default();
            queues.insert(kind, WorkQueue::new(config.queue_capacity));
        }
        Self {
            queues,
            cluster_index: Arc::new(RwLock::new(cluster_index)),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub async fn enqueue(&self, target: QueueKey) {
        if let Some(queue) = self.queues.get(&target.kind) {
            queue.enqueue(target.key).await;
        }
    }

    /// Replace the Cluster→dependents index, e.g. after a startup `List`.
    pub async fn set_cluster_index(&self, index: ClusterIndex) {
        *self.cluster_index.write().await = index;
    }

    /// Route one watch event for `kind`, enqueuing every resolved target.
    pub async fn route(&self, kind: Kind, event: WatchEvent) {
        let targets = {
            let index = self.cluster_index.read().await;
            route_watch_event(kind, &event, &index)
        };
        for target in targets {
            self.enqueue(target).await;
        }
    }

    /// Spawn `concurrency` workers per configured kind, each draining its
    /// queue until cancelled.
    pub fn spawn_workers(
        &self,
        configs: &HashMap<Kind, KindConfig>,
        client: Arc<dyn OrchestratorClient>,
        cache: Arc<CapabilityCache>,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        for kind in PARENT_KINDS {
            let config = configs.get(&kind).copied().unwrap_or_default();
            let queue = self.queues[&kind].clone();
            for worker_id in 0..config.concurrency {
                let queue = queue.clone();
                let client = client.clone();
                let cache = cache.clone();
                let cancellation = self.cancellation.clone();
                handles.push(tokio::spawn(async move {
                    worker_loop(kind, worker_id, queue, client, cache, cancellation).await;
                }));
            }
        }
        handles
    }
}

async fn worker_loop(
    kind: Kind,
    worker_id: usize,
    queue: WorkQueue,
    client: Arc<dyn OrchestratorClient>,
    cache: Arc<CapabilityCache>,
    cancellation: CancellationToken,
) {
    let mut backoffs: HashMap<ResourceKey, Backoff> = HashMap::new();
    loop {
        let key = tokio::select! {
            _ = cancellation.cancelled() => break,
            key = queue.dequeue() => match key {
                Some(key) => key,
                None => break,
            },
        };

        let span = tracing::info_span!(
            "reconcile",
            kind = %kind,
            namespace = %key.namespace,
            name = %key.name,
            worker = %worker_id,
        );
        let result = dispatch(kind, client.as_ref(), cache.as_ref(), &key).instrument(span).await;

        match result {
            Ok(outcome) => {
                backoffs.remove(&key);
                queue.release(&key).await;
                if let Some(delay) = outcome.requeue_after {
                    schedule_requeue(queue.clone(), key, delay, cancellation.clone());
                } else if outcome.requeue {
                    queue.enqueue(key).await;
                }
            }
            Err(err) => {
                warn!(kind = %kind, key = %key, error = %err, "reconcile failed, scheduling retry");
                queue.release(&key).await;
                let delay = backoffs.entry(key.clone()).or_insert_with(Backoff::new).next_delay();
                schedule_requeue(queue.clone(), key, delay, cancellation.clone());
            }
        }
    }
    info!(kind = %kind, worker = %worker_id, "worker shutting down");
}

fn schedule_requeue(queue: WorkQueue, key: ResourceKey, delay: Duration, cancellation: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancellation.cancelled() => {}
            _ = tokio::time::sleep(delay) => {
                queue.enqueue(key).await;
            }
        }
    });
}

async fn dispatch(
    kind: Kind,
    client: &dyn OrchestratorClient,
    cache: &CapabilityCache,
    key: &ResourceKey,
) -> Result<ReconcileOutcome, ReconcileError> {
    match kind {
        Kind::Cluster => reconcile_cluster(client, key).await,
        Kind::Tool => reconcile_tool(client, key).await,
        Kind::Agent => reconcile_agent(client, cache, key).await,
        Kind::Persona => reconcile_persona(client, key).await,
        _ => Ok(ReconcileOutcome::done()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langop_client::FakeOrchestratorClient;
    use langop_domain::{Cluster, ClusterSpec, FINALIZER};

    #[tokio::test]
    async fn enqueued_cluster_is_reconciled_to_finalizer_present() {
        let client: Arc<dyn OrchestratorClient> = Arc::new(FakeOrchestratorClient::new());
        let key = ResourceKey::new("default", "prod");
        client
            .create(Kind::Cluster, serde_json::to_value(Cluster::new("default", "prod", ClusterSpec::default())).unwrap())
            .await
            .unwrap();

        let dispatcher = Dispatcher::new(&HashMap::new(), ClusterIndex::new());
        let cache = Arc::new(CapabilityCache::new());
        let handles = dispatcher.spawn_workers(&HashMap::new(), client.clone(), cache);
        dispatcher.enqueue(QueueKey::new(Kind::Cluster, key.clone())).await;

        // First pass adds the finalizer and requeues immediately; let that
        // second pass land before asserting.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stored: Cluster = serde_json::from_value(client.get(Kind::Cluster, &key).await.unwrap().unwrap()).unwrap();
        assert!(stored.metadata.has_finalizer(FINALIZER));

        dispatcher.cancel();
        for handle in handles {
            let _ = handle.await;
        }
    }

    #[test]
    fn default_kind_config_is_reasonable() {
        let config = KindConfig::default();
        assert!(config.concurrency >= 1);
        assert!(config.queue_capacity >= 1);
    }
}
