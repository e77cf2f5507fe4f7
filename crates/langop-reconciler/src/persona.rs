use chrono::Utc;
use langop_builder::persona_config;
use langop_client::OrchestratorClient;
use langop_domain::{ConditionStatus, Kind, Persona, ResourceKey, CONDITION_READY, FINALIZER};
use langop_status::{derive_simple_phase, set_condition};

use crate::convergence::{converge, fetch};
use crate::error::ReconcileError;
use crate::report::ReconcileOutcome;

/// Reconcile a single Persona (§4.4).
///
/// A Persona has no workload of its own: its only child is a rendered
/// ConfigObject that Agents referencing it mount as configuration.
pub async fn reconcile_persona(
    client: &dyn OrchestratorClient,
    key: &ResourceKey,
) -> Result<ReconcileOutcome, ReconcileError> {
    let Some(mut persona) = fetch::<Persona>(client, Kind::Persona, key).await? else {
        return Ok(ReconcileOutcome::done());
    };

    if persona.metadata.is_deleting() {
        return reconcile_deleting(client, persona).await;
    }

    if !persona.metadata.has_finalizer(FINALIZER) {
        persona.metadata.add_finalizer(FINALIZER);
        client.update(Kind::Persona, key, serde_json::to_value(&persona)?).await?;
        return Ok(ReconcileOutcome::requeue_now());
    }

    let config = persona_config(&persona);
    converge(client, Kind::ConfigObject, &config_key(key), Some((config.metadata.clone(), config))).await?;

    let now = Utc::now();
    let generation = persona.metadata.generation;
    let (phase, reason) = derive_simple_phase(true, false);
    persona.status.observed_generation = generation;
    persona.status.phase = phase;
    set_condition(
        &mut persona.status.conditions,
        CONDITION_READY,
        ConditionStatus::True,
        reason,
        "persona has no workload of its own; ready once reconciled",
        generation,
        now,
    );

    client.update_status(Kind::Persona, key, serde_json::to_value(&persona.status)?).await?;
    Ok(ReconcileOutcome::done())
}

async fn reconcile_deleting(
    client: &dyn OrchestratorClient,
    mut persona: Persona,
) -> Result<ReconcileOutcome, ReconcileError> {
    let key = persona.metadata.key();
    if !persona.metadata.has_finalizer(FINALIZER) {
        return Ok(ReconcileOutcome::done());
    }

    converge::<langop_domain::ConfigObjectManifest>(client, Kind::ConfigObject, &config_key(&key), None).await?;

    persona.metadata.remove_finalizer(FINALIZER);
    client.update(Kind::Persona, &key, serde_json::to_value(&persona)?).await?;
    Ok(ReconcileOutcome::done())
}

fn config_key(persona_key: &ResourceKey) -> ResourceKey {
    ResourceKey::new(&persona_key.namespace, langop_builder::config_name(&persona_key.name, "config"))
}
