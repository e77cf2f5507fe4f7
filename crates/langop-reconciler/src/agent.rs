use chrono::Utc;
use langop_builder::{agent_deployment, agent_route, agent_service};
use langop_cache::CapabilityCache;
use langop_client::OrchestratorClient;
use langop_domain::{
    Agent, Cluster, ConditionStatus, DeploymentMode, Kind, Persona, Phase, ResourceKey, Tool,
    CONDITION_READY, FINALIZER,
};
use langop_graph::GraphError;
use langop_status::{derive_workload_phase, set_condition};

use crate::convergence::{converge, converge_deployment, fetch, observe_deployment_status};
use crate::error::ReconcileError;
use crate::report::ReconcileOutcome;

/// API group/version backing Route objects, gated on the capability cache
/// (§4.1) before an Agent's Route is ever created or updated.
const ROUTING_API_GROUP_VERSION: &str = "routing.langop.io/v1";

/// Reconcile a single Agent (§4.4).
///
/// An Agent folds its Persona (if any) and every sidecar-mode Tool it
/// references into a single Deployment, fronted by a Service and, when
/// `routing.expose` is set, a Route.
pub async fn reconcile_agent(
    client: &dyn OrchestratorClient,
    cache: &CapabilityCache,
    key: &ResourceKey,
) -> Result<ReconcileOutcome, ReconcileError> {
    let Some(mut agent) = fetch::<Agent>(client, Kind::Agent, key).await? else {
        return Ok(ReconcileOutcome::done());
    };

    if agent.metadata.is_deleting() {
        return reconcile_deleting(client, agent).await;
    }

    if !agent.metadata.has_finalizer(FINALIZER) {
        agent.metadata.add_finalizer(FINALIZER);
        client.update(Kind::Agent, key, serde_json::to_value(&agent)?).await?;
        return Ok(ReconcileOutcome::requeue_now());
    }

    if let Err(err) = ensure_cluster_ref(client, &agent).await {
        return mark_invalid_spec(client, &mut agent, err).await;
    }

    let persona = match fetch_persona(client, &agent).await {
        Ok(persona) => persona,
        Err(err) => return mark_invalid_spec(client, &mut agent, err).await,
    };
    let sidecar_tools = match fetch_sidecar_tools(client, &agent).await {
        Ok(tools) => tools,
        Err(err) => return mark_invalid_spec(client, &mut agent, err).await,
    };

    converge_children(client, cache, &agent, persona.as_ref(), &sidecar_tools).await?;
    sync_status(client, &mut agent).await?;

    Ok(ReconcileOutcome::done())
}

/// A dangling `clusterRef`/`personaRef`/`toolRef` is not retried tightly:
/// the Agent is marked `Ready=False`/`Failed` and reconciliation waits for
/// the referenced object to appear (re-enqueued via the cross-reference
/// watch) rather than looping the dispatcher's backoff against a spec that
/// cannot converge until something else changes.
async fn mark_invalid_spec(
    client: &dyn OrchestratorClient,
    agent: &mut Agent,
    err: ReconcileError,
) -> Result<ReconcileOutcome, ReconcileError> {
    let key = agent.metadata.key();
    let generation = agent.metadata.generation;
    let now = Utc::now();

    agent.status.observed_generation = generation;
    agent.status.phase = Phase::Failed;
    agent.status.endpoint = None;
    set_condition(
        &mut agent.status.conditions,
        CONDITION_READY,
        ConditionStatus::False,
        "InvalidSpec",
        &err.to_string(),
        generation,
        now,
    );

    client.update_status(Kind::Agent, &key, serde_json::to_value(&agent.status)?).await?;
    Err(err)
}

async fn ensure_cluster_ref(client: &dyn OrchestratorClient, agent: &Agent) -> Result<(), ReconcileError> {
    let key = ResourceKey::new(&agent.metadata.namespace, &agent.spec.cluster_ref);
    if fetch::<Cluster>(client, Kind::Cluster, &key).await?.is_none() {
        return Err(GraphError::DanglingClusterRef {
            kind: Kind::Agent,
            key: agent.metadata.key(),
            cluster_ref: agent.spec.cluster_ref.clone(),
        }
        .into());
    }
    Ok(())
}

async fn reconcile_deleting(
    client: &dyn OrchestratorClient,
    mut agent: Agent,
) -> Result<ReconcileOutcome, ReconcileError> {
    let key = agent.metadata.key();
    if !agent.metadata.has_finalizer(FINALIZER) {
        return Ok(ReconcileOutcome::done());
    }

    converge_deployment(client, &deployment_key(&key), None).await?;
    converge::<langop_domain::ServiceManifest>(client, Kind::Service, &service_key(&key), None).await?;
    converge::<langop_domain::RouteManifest>(client, Kind::Route, &route_key(&key), None).await?;

    agent.metadata.remove_finalizer(FINALIZER);
    client.update(Kind::Agent, &key, serde_json::to_value(&agent)?).await?;
    Ok(ReconcileOutcome::done())
}

/// `None` means "no persona attached" (`persona_ref` unset). A `persona_ref`
/// that names an object which does not exist is a dangling reference, not an
/// absent one, and surfaces as `InvalidSpec`.
async fn fetch_persona(client: &dyn OrchestratorClient, agent: &Agent) -> Result<Option<Persona>, ReconcileError> {
    let Some(persona_ref) = &agent.spec.persona_ref else {
        return Ok(None);
    };
    let key = ResourceKey::new(&agent.metadata.namespace, persona_ref);
    match fetch::<Persona>(client, Kind::Persona, &key).await? {
        Some(persona) => Ok(Some(persona)),
        None => Err(GraphError::DanglingPersonaRef {
            agent: agent.metadata.key(),
            persona_ref: persona_ref.clone(),
        }
        .into()),
    }
}

async fn fetch_sidecar_tools(client: &dyn OrchestratorClient, agent: &Agent) -> Result<Vec<Tool>, ReconcileError> {
    let mut tools = Vec::new();
    for tool_ref in &agent.spec.tool_refs {
        let key = ResourceKey::new(&agent.metadata.namespace, tool_ref);
        let Some(tool) = fetch::<Tool>(client, Kind::Tool, &key).await? else {
            return Err(GraphError::DanglingToolRef {
                agent: agent.metadata.key(),
                tool_ref: tool_ref.clone(),
            }
            .into());
        };
        if tool.spec.deployment_mode == DeploymentMode::Sidecar {
            tools.push(tool);
        }
    }
    Ok(tools)
}

async fn converge_children(
    client: &dyn OrchestratorClient,
    cache: &CapabilityCache,
    agent: &Agent,
    persona: Option<&Persona>,
    sidecar_tools: &[Tool],
) -> Result<(), ReconcileError> {
    let key = agent.metadata.key();
    let sidecar_refs: Vec<&Tool> = sidecar_tools.iter().collect();

    let deployment = agent_deployment(agent, persona, &sidecar_refs);
    converge_deployment(client, &deployment_key(&key), Some(deployment)).await?;

    let service = agent_service(agent);
    converge(client, Kind::Service, &service_key(&key), Some((service.metadata.clone(), service))).await?;

    let route = if routing_api_available(client, cache).await? {
        agent_route(agent).map(|r| (r.metadata.clone(), r))
    } else {
        None
    };
    converge(client, Kind::Route, &route_key(&key), route).await?;

    Ok(())
}

/// Whether the orchestrator currently exposes the routing API group this
/// Agent's Route would target. A backend that never advertises it gets a
/// graceful skip instead of a doomed create/update against a missing group.
async fn routing_api_available(
    client: &dyn OrchestratorClient,
    cache: &CapabilityCache,
) -> Result<bool, ReconcileError> {
    cache
        .is_available(ROUTING_API_GROUP_VERSION, || async {
            client.discover_group(ROUTING_API_GROUP_VERSION).await.map_err(|err| {
                langop_cache::CacheError::ProbeFailed {
                    group_version: ROUTING_API_GROUP_VERSION.to_string(),
                    reason: err.to_string(),
                }
            })
        })
        .await
        .map_err(ReconcileError::from)
}

async fn sync_status(client: &dyn OrchestratorClient, agent: &mut Agent) -> Result<(), ReconcileError> {
    let key = agent.metadata.key();
    let generation = agent.metadata.generation;
    let now = Utc::now();

    let counts = observe_deployment_status(client, &deployment_key(&key), agent.spec.replicas).await?;
    let (phase, reason) = derive_workload_phase(counts);

    agent.status.observed_generation = generation;
    agent.status.phase = phase;
    agent.status.ready_replicas = counts.ready;
    agent.status.endpoint = if agent.spec.routing.expose && phase == langop_domain::Phase::Running {
        Some(format!("/{}", agent.metadata.name))
    } else {
        None
    };

    let condition_status = if phase == langop_domain::Phase::Running {
        ConditionStatus::True
    } else if phase == langop_domain::Phase::Failed {
        ConditionStatus::False
    } else {
        ConditionStatus::Unknown
    };

    set_condition(
        &mut agent.status.conditions,
        CONDITION_READY,
        condition_status,
        reason,
        &format!("{} ready replicas", counts.ready),
        generation,
        now,
    );

    client.update_status(Kind::Agent, &key, serde_json::to_value(&agent.status)?).await?;
    Ok(())
}

fn deployment_key(agent_key: &ResourceKey) -> ResourceKey {
    ResourceKey::new(&agent_key.namespace, langop_builder::config_name(&agent_key.name, "deployment"))
}

fn service_key(agent_key: &ResourceKey) -> ResourceKey {
    ResourceKey::new(&agent_key.namespace, langop_builder::config_name(&agent_key.name, "svc"))
}

fn route_key(agent_key: &ResourceKey) -> ResourceKey {
    ResourceKey::new(&agent_key.namespace, langop_builder::config_name(&agent_key.name, "route"))
}
