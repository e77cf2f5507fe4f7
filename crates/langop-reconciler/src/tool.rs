use chrono::Utc;
use langop_builder::{tool_deployment, tool_service};
use langop_client::OrchestratorClient;
use langop_domain::{Cluster, ConditionStatus, Kind, Phase, ResourceKey, Tool, CONDITION_READY, FINALIZER};
use langop_graph::GraphError;
use langop_status::{derive_workload_phase, set_condition};

use crate::convergence::{converge, converge_deployment, fetch, observe_deployment_status};
use crate::error::ReconcileError;
use crate::report::ReconcileOutcome;

/// Reconcile a single Tool (§4.4).
pub async fn reconcile_tool(
    client: &dyn OrchestratorClient,
    key: &ResourceKey,
) -> Result<ReconcileOutcome, ReconcileError> {
    let Some(mut tool) = fetch::<Tool>(client, Kind::Tool, key).await? else {
        return Ok(ReconcileOutcome::done());
    };

    if tool.metadata.is_deleting() {
        return reconcile_deleting(client, tool).await;
    }

    if !tool.metadata.has_finalizer(FINALIZER) {
        tool.metadata.add_finalizer(FINALIZER);
        client.update(Kind::Tool, key, serde_json::to_value(&tool)?).await?;
        return Ok(ReconcileOutcome::requeue_now());
    }

    if let Err(err) = ensure_cluster_ref(client, &tool).await {
        return mark_invalid_spec(client, &mut tool, err).await;
    }

    converge_children(client, &tool).await?;
    sync_status(client, &mut tool).await?;

    Ok(ReconcileOutcome::done())
}

/// A dangling `clusterRef` is not retried tightly: the Tool is marked
/// `Ready=False`/`Failed` and reconciliation waits for the referenced
/// Cluster to appear via the cross-reference watch.
async fn mark_invalid_spec(
    client: &dyn OrchestratorClient,
    tool: &mut Tool,
    err: ReconcileError,
) -> Result<ReconcileOutcome, ReconcileError> {
    let key = tool.metadata.key();
    let generation = tool.metadata.generation;
    let now = Utc::now();

    tool.status.observed_generation = generation;
    tool.status.phase = Phase::Failed;
    set_condition(
        &mut tool.status.conditions,
        CONDITION_READY,
        ConditionStatus::False,
        "InvalidSpec",
        &err.to_string(),
        generation,
        now,
    );

    client.update_status(Kind::Tool, &key, serde_json::to_value(&tool.status)?).await?;
    Err(err)
}

async fn ensure_cluster_ref(client: &dyn OrchestratorClient, tool: &Tool) -> Result<(), ReconcileError> {
    let key = ResourceKey::new(&tool.metadata.namespace, &tool.spec.cluster_ref);
    if fetch::<Cluster>(client, Kind::Cluster, &key).await?.is_none() {
        return Err(GraphError::DanglingClusterRef {
            kind: Kind::Tool,
            key: tool.metadata.key(),
            cluster_ref: tool.spec.cluster_ref.clone(),
        }
        .into());
    }
    Ok(())
}

async fn reconcile_deleting(
    client: &dyn OrchestratorClient,
    mut tool: Tool,
) -> Result<ReconcileOutcome, ReconcileError> {
    let key = tool.metadata.key();
    if !tool.metadata.has_finalizer(FINALIZER) {
        return Ok(ReconcileOutcome::done());
    }

    converge_deployment(client, &deployment_key(&key), None).await?;
    converge::<langop_domain::ServiceManifest>(client, Kind::Service, &service_key(&key), None).await?;

    tool.metadata.remove_finalizer(FINALIZER);
    client.update(Kind::Tool, &key, serde_json::to_value(&tool)?).await?;
    Ok(ReconcileOutcome::done())
}

async fn converge_children(client: &dyn OrchestratorClient, tool: &Tool) -> Result<(), ReconcileError> {
    let key = tool.metadata.key();

    let deployment = tool_deployment(tool);
    converge_deployment(client, &deployment_key(&key), deployment).await?;

    let service = tool_service(tool).map(|s| (s.metadata.clone(), s));
    converge(client, Kind::Service, &service_key(&key), service).await?;

    Ok(())
}

async fn sync_status(client: &dyn OrchestratorClient, tool: &mut Tool) -> Result<(), ReconcileError> {
    let key = tool.metadata.key();
    let generation = tool.metadata.generation;
    let now = Utc::now();

    // Sidecar-mode tools have no Deployment of their own; they are ready as
    // soon as their owning Agent's pod is (tracked on the Agent, not here).
    let (phase, reason, ready_replicas) = if tool.spec.deployment_mode == langop_domain::DeploymentMode::Sidecar {
        (langop_domain::Phase::Ready, "SidecarHasNoOwnWorkload", tool.spec.replicas)
    } else {
        let counts = observe_deployment_status(client, &deployment_key(&key), tool.spec.replicas).await?;
        let (phase, reason) = derive_workload_phase(counts);
        (phase, reason, counts.ready)
    };

    tool.status.observed_generation = generation;
    tool.status.phase = phase;
    tool.status.ready_replicas = ready_replicas;
    tool.status.available_replicas = ready_replicas;

    let condition_status =
        if phase == langop_domain::Phase::Ready || phase == langop_domain::Phase::Running {
            ConditionStatus::True
        } else if phase == langop_domain::Phase::Failed {
            ConditionStatus::False
        } else {
            ConditionStatus::Unknown
        };

    set_condition(
        &mut tool.status.conditions,
        CONDITION_READY,
        condition_status,
        reason,
        &format!("{} ready replicas", ready_replicas),
        generation,
        now,
    );

    client.update_status(Kind::Tool, &key, serde_json::to_value(&tool.status)?).await?;
    Ok(())
}

fn deployment_key(tool_key: &ResourceKey) -> ResourceKey {
    ResourceKey::new(&tool_key.namespace, langop_builder::config_name(&tool_key.name, "deployment"))
}

fn service_key(tool_key: &ResourceKey) -> ResourceKey {
    ResourceKey::new(&tool_key.namespace, langop_builder::config_name(&tool_key.name, "svc"))
}
