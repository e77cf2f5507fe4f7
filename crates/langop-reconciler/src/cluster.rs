use chrono::Utc;
use langop_client::OrchestratorClient;
use langop_domain::{Cluster, ConditionStatus, Kind, ResourceKey, CONDITION_READY, FINALIZER};
use langop_status::{derive_simple_phase, set_condition};
use tracing::{debug, info};

use crate::convergence::fetch;
use crate::error::ReconcileError;
use crate::report::ReconcileOutcome;

/// Reconcile a single Cluster (§4.4.1).
///
/// A Cluster has no child workload of its own; its only duties are
/// finalizer bookkeeping and, on deletion, cascading the delete to every
/// Tool and Agent that names it in `clusterRef` before releasing its own
/// finalizer.
pub async fn reconcile_cluster(
    client: &dyn OrchestratorClient,
    key: &ResourceKey,
) -> Result<ReconcileOutcome, ReconcileError> {
    let Some(mut cluster) = fetch::<Cluster>(client, Kind::Cluster, key).await? else {
        return Ok(ReconcileOutcome::done());
    };

    if cluster.metadata.is_deleting() {
        return reconcile_deleting(client, &mut cluster).await;
    }

    if !cluster.metadata.has_finalizer(FINALIZER) {
        cluster.metadata.add_finalizer(FINALIZER);
        client
            .update(Kind::Cluster, key, serde_json::to_value(&cluster)?)
            .await?;
        return Ok(ReconcileOutcome::requeue_now());
    }

    let now = Utc::now();
    let generation = cluster.metadata.generation;
    let (phase, reason) = derive_simple_phase(true, false);
    cluster.status.observed_generation = generation;
    cluster.status.phase = phase;
    set_condition(
        &mut cluster.status.conditions,
        CONDITION_READY,
        ConditionStatus::True,
        reason,
        "cluster has no workload of its own; ready once reconciled",
        generation,
        now,
    );

    client
        .update_status(Kind::Cluster, key, serde_json::to_value(&cluster.status)?)
        .await?;

    Ok(ReconcileOutcome::done())
}

/// A Cluster's own finalizer is released in the same reconcile invocation
/// that issues cascade deletes against its current dependents — the Cluster
/// does not wait for those dependents to actually vanish. Each dependent's
/// own reconciler (with its own finalizer) owns tearing down its own
/// children before it is actually removed.
async fn reconcile_deleting(
    client: &dyn OrchestratorClient,
    cluster: &mut Cluster,
) -> Result<ReconcileOutcome, ReconcileError> {
    let key = cluster.metadata.key();
    if !cluster.metadata.has_finalizer(FINALIZER) {
        return Ok(ReconcileOutcome::done());
    }

    let tools = client.list(Kind::Tool, Some(&key.namespace)).await?;
    let agents = client.list(Kind::Agent, Some(&key.namespace)).await?;

    for tool in &tools {
        if references_cluster(tool, &key.name) {
            let tool_key = object_key(tool)?;
            debug!(cluster = %key, tool = %tool_key, "cascading delete to dependent tool");
            client.delete(Kind::Tool, &tool_key).await?;
        }
    }
    for agent in &agents {
        if references_cluster(agent, &key.name) {
            let agent_key = object_key(agent)?;
            debug!(cluster = %key, agent = %agent_key, "cascading delete to dependent agent");
            client.delete(Kind::Agent, &agent_key).await?;
        }
    }

    info!(cluster = %key, "cascade deletes issued, releasing finalizer");
    cluster.metadata.remove_finalizer(FINALIZER);
    client
        .update(Kind::Cluster, &key, serde_json::to_value(&cluster)?)
        .await?;
    Ok(ReconcileOutcome::done())
}

fn references_cluster(object: &serde_json::Value, cluster_name: &str) -> bool {
    object
        .get("spec")
        .and_then(|s| s.get("clusterRef").or_else(|| s.get("cluster_ref")))
        .and_then(|v| v.as_str())
        == Some(cluster_name)
}

fn object_key(object: &serde_json::Value) -> Result<ResourceKey, ReconcileError> {
    let metadata = object
        .get("metadata")
        .ok_or_else(|| ReconcileError::Internal("listed object missing metadata".into()))?;
    let namespace = metadata
        .get("namespace")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ReconcileError::Internal("listed object missing metadata.namespace".into()))?;
    let name = metadata
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ReconcileError::Internal("listed object missing metadata.name".into()))?;
    Ok(ResourceKey::new(namespace, name))
}
