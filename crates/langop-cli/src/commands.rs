use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use langop_cache::CapabilityCache;
use langop_client::{FakeOrchestratorClient, OrchestratorClient};
use langop_config::{load_manifests, Manifests};
use langop_dispatcher::{Dispatcher, KindConfig};
use langop_domain::{Kind, QueueKey, ResourceKey};
use langop_graph::{validate, ResolvedGraph};
use langop_reconciler::{
    reconcile_agent, reconcile_cluster, reconcile_persona, reconcile_tool, ReconcileOutcome,
};
use tracing::{info, warn};

/// A single resource is reconciled at most this many times in one `apply`
/// pass before we give up and move on to the next one.
const MAX_CONVERGE_ATTEMPTS: u32 = 10;

pub async fn apply(manifests_dir: PathBuf) -> Result<()> {
    let manifests = read_manifests(&manifests_dir)?;
    let resolved = resolve(&manifests)?;
    let client = seed_client(&manifests).await?;
    let cache = CapabilityCache::new();

    println!(
        "loaded {} cluster(s), {} tool(s), {} agent(s), {} persona(s)",
        manifests.clusters.len(),
        manifests.tools.len(),
        manifests.agents.len(),
        manifests.personas.len(),
    );

    for target in &resolved.topo_order {
        converge_one(&client, &cache, target).await?;
    }

    Ok(())
}

pub async fn status(manifests_dir: PathBuf) -> Result<()> {
    let manifests = read_manifests(&manifests_dir)?;
    let resolved = resolve(&manifests)?;

    println!(
        "{} cluster(s), {} tool(s), {} agent(s), {} persona(s)",
        manifests.clusters.len(),
        manifests.tools.len(),
        manifests.agents.len(),
        manifests.personas.len(),
    );
    println!("dependency order:");
    for target in &resolved.topo_order {
        println!("  {} {}", target.kind, target.key);
    }

    Ok(())
}

pub async fn serve(manifests_dir: PathBuf, bind: String, token: String) -> Result<()> {
    let manifests = read_manifests(&manifests_dir)?;
    let resolved = resolve(&manifests)?;
    let client: Arc<dyn OrchestratorClient> = Arc::new(seed_client(&manifests).await?);

    let cache = Arc::new(CapabilityCache::new());
    let configs: HashMap<Kind, KindConfig> = HashMap::new();
    let dispatcher = Dispatcher::new(&configs, resolved.cluster_index);
    let workers = dispatcher.spawn_workers(&configs, client.clone(), cache.clone());

    for target in &resolved.topo_order {
        dispatcher.enqueue(target.clone()).await;
    }

    let app = langop_api::build_app(client.clone(), cache, Arc::new(token));
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;

    info!(%bind, "serving health/status surface");
    tokio::select! {
        result = axum::serve(listener, app) => {
            result.context("http server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    dispatcher.cancel();
    for handle in workers {
        let _ = handle.await;
    }

    Ok(())
}

fn read_manifests(dir: &PathBuf) -> Result<Manifests> {
    load_manifests(dir).with_context(|| format!("loading manifests from {}", dir.display()))
}

fn resolve(manifests: &Manifests) -> Result<ResolvedGraph> {
    validate(&manifests.clusters, &manifests.tools, &manifests.agents, &manifests.personas)
        .context("manifest graph failed validation")
}

async fn seed_client(manifests: &Manifests) -> Result<FakeOrchestratorClient> {
    let client = FakeOrchestratorClient::new();
    for cluster in &manifests.clusters {
        let key = cluster.metadata.key();
        client.seed(Kind::Cluster, key, serde_json::to_value(cluster)?).await;
    }
    for tool in &manifests.tools {
        let key = tool.metadata.key();
        client.seed(Kind::Tool, key, serde_json::to_value(tool)?).await;
    }
    for agent in &manifests.agents {
        let key = agent.metadata.key();
        client.seed(Kind::Agent, key, serde_json::to_value(agent)?).await;
    }
    for persona in &manifests.personas {
        let key = persona.metadata.key();
        client.seed(Kind::Persona, key, serde_json::to_value(persona)?).await;
    }
    Ok(client)
}

/// Reconcile `target` until it reports no further requeue, honoring any
/// requested delay, up to [`MAX_CONVERGE_ATTEMPTS`].
async fn converge_one(client: &dyn OrchestratorClient, cache: &CapabilityCache, target: &QueueKey) -> Result<()> {
    for attempt in 0..MAX_CONVERGE_ATTEMPTS {
        let outcome = dispatch_once(target.kind, client, cache, &target.key).await?;
        println!("{} {}: reconciled (pass {})", target.kind, target.key, attempt + 1);
        if !outcome.requeue {
            return Ok(());
        }
        if let Some(delay) = outcome.requeue_after {
            tokio::time::sleep(delay).await;
        }
    }

    warn!(kind = %target.kind, key = %target.key, "did not converge within the retry budget");
    Ok(())
}

async fn dispatch_once(
    kind: Kind,
    client: &dyn OrchestratorClient,
    cache: &CapabilityCache,
    key: &ResourceKey,
) -> Result<ReconcileOutcome> {
    match kind {
        Kind::Cluster => Ok(reconcile_cluster(client, key).await?),
        Kind::Tool => Ok(reconcile_tool(client, key).await?),
        Kind::Agent => Ok(reconcile_agent(client, cache, key).await?),
        Kind::Persona => Ok(reconcile_persona(client, key).await?),
        other => bail!("{other} is not a reconcilable parent kind"),
    }
}
