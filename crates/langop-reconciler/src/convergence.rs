use langop_client::{ClientError, OrchestratorClient};
use langop_domain::{ChildMeta, DeploymentManifest, DeploymentStatus, Kind, ResourceKey};
use langop_status::{compute_desired_hash, ReplicaCounts};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ReconcileError;

fn wrap_child<S: Serialize>(meta: &ChildMeta, spec: &S, status: Option<Value>) -> Value {
    let mut value = serde_json::json!({
        "metadata": meta,
        "spec": spec,
    });
    if let Some(status) = status {
        value["status"] = status;
    }
    value
}

/// Create, update, or delete a child object with no status subresource of
/// its own (Service, ConfigObject, Route), comparing against the existing
/// object's `spec` by content hash rather than touching its `status`.
pub async fn converge<T>(
    client: &dyn OrchestratorClient,
    kind: Kind,
    key: &ResourceKey,
    desired: Option<(ChildMeta, T)>,
) -> Result<(), ReconcileError>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    let existing = client.get(kind, key).await?;
    match (existing, desired) {
        (None, None) => Ok(()),
        (None, Some((meta, spec))) => {
            client.create(kind, wrap_child(&meta, &spec, None)).await?;
            Ok(())
        }
        (Some(_), None) => {
            client.delete(kind, key).await?;
            Ok(())
        }
        (Some(existing_value), Some((meta, spec))) => {
            let existing_spec: T = serde_json::from_value(
                existing_value.get("spec").cloned().unwrap_or(Value::Null),
            )?;
            if compute_desired_hash(&existing_spec) != compute_desired_hash(&spec) {
                client.update(kind, key, wrap_child(&meta, &spec, None)).await?;
            }
            Ok(())
        }
    }
}

/// Create, update, or delete a Deployment child, preserving its observed
/// `status` across spec updates and seeding a zeroed status on creation so
/// the first status sync has something to read.
pub async fn converge_deployment(
    client: &dyn OrchestratorClient,
    key: &ResourceKey,
    desired: Option<DeploymentManifest>,
) -> Result<(), ReconcileError> {
    let existing = client.get(Kind::Deployment, key).await?;
    match (existing, desired) {
        (None, None) => Ok(()),
        (None, Some(d)) => {
            let status = serde_json::to_value(DeploymentStatus::default())?;
            client
                .create(Kind::Deployment, wrap_child(&d.metadata, &d, Some(status)))
                .await?;
            Ok(())
        }
        (Some(_), None) => {
            client.delete(Kind::Deployment, key).await?;
            Ok(())
        }
        (Some(existing_value), Some(d)) => {
            let existing_spec: DeploymentManifest = serde_json::from_value(
                existing_value.get("spec").cloned().unwrap_or(Value::Null),
            )?;
            if compute_desired_hash(&existing_spec) != compute_desired_hash(&d) {
                let status = existing_value.get("status").cloned();
                client
                    .update(Kind::Deployment, key, wrap_child(&d.metadata, &d, status))
                    .await?;
            }
            Ok(())
        }
    }
}

/// Read back a Deployment child's observed replica counters for phase
/// derivation. A missing child (not yet created, or never desired) reads as
/// all-zero counters.
pub async fn observe_deployment_status(
    client: &dyn OrchestratorClient,
    key: &ResourceKey,
    desired_replicas: u32,
) -> Result<ReplicaCounts, ReconcileError> {
    let existing = client.get(Kind::Deployment, key).await?;
    let status: DeploymentStatus = existing
        .and_then(|v| v.get("status").cloned())
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    Ok(ReplicaCounts {
        desired: desired_replicas,
        ready: status.ready_replicas,
        updated: status.updated_replicas,
        unavailable: status.unavailable_replicas,
    })
}

/// Fetch and deserialize a typed parent object, treating a transport
/// `NotFound` the same as an absent `get` result.
pub async fn fetch<T: DeserializeOwned>(
    client: &dyn OrchestratorClient,
    kind: Kind,
    key: &ResourceKey,
) -> Result<Option<T>, ReconcileError> {
    match client.get(kind, key).await {
        Ok(Some(value)) => Ok(Some(serde_json::from_value(value)?)),
        Ok(None) => Ok(None),
        Err(ClientError::NotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
