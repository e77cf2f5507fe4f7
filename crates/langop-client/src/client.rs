use async_trait::async_trait;
use langop_domain::{Kind, ResourceKey};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ClientError;

/// A change observed on a watched kind, surfaced to the dispatcher (C5).
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Added(Value),
    Modified(Value),
    Deleted(Value),
}

/// Dynamic orchestrator client: all CRUD is parameterized by [`Kind`] and
/// operates over `serde_json::Value`, the way a dynamic/unstructured
/// Kubernetes client operates over any GVK without a generated type per kind.
///
/// This is the only seam between the reconciler and whatever backend actually
/// stores cluster/tool/agent/persona state; the reconciler never talks to a
/// concrete backend directly.
#[async_trait]
pub trait OrchestratorClient: Send + Sync + 'static {
    /// Fetch a single object. `Ok(None)` means "does not exist", distinct
    /// from a transport failure.
    async fn get(&self, kind: Kind, key: &ResourceKey) -> Result<Option<Value>, ClientError>;

    /// List every object of `kind`, optionally scoped to a namespace.
    async fn list(&self, kind: Kind, namespace: Option<&str>) -> Result<Vec<Value>, ClientError>;

    /// Create a new object. Returns `Conflict` if one already exists at this key.
    async fn create(&self, kind: Kind, object: Value) -> Result<Value, ClientError>;

    /// Replace the spec/metadata of an existing object.
    async fn update(&self, kind: Kind, key: &ResourceKey, object: Value) -> Result<Value, ClientError>;

    /// Replace only the status subresource, leaving spec/metadata untouched.
    async fn update_status(
        &self,
        kind: Kind,
        key: &ResourceKey,
        status: Value,
    ) -> Result<Value, ClientError>;

    /// Delete an object. Idempotent: deleting an already-absent object is not
    /// an error. If the object currently carries finalizers, this does not
    /// remove it — it stamps `metadata.deletion_timestamp` and leaves the
    /// object in place for its owning reconciler(s) to tear down and release
    /// their finalizers via `update`; only once the finalizer list is empty
    /// does a `delete` call actually remove the object.
    async fn delete(&self, kind: Kind, key: &ResourceKey) -> Result<(), ClientError>;

    /// Subscribe to change events for a kind. Used by the dispatcher (C5) to
    /// enqueue reconciles; the receiver end is owned by the caller.
    async fn watch(&self, kind: Kind) -> Result<mpsc::Receiver<WatchEvent>, ClientError>;

    /// Probe whether a named API group/version is currently available. Backs
    /// the capability cache (C1) — implementations that have no notion of API
    /// groups (e.g. a fixed local backend) can simply always return `true`.
    async fn discover_group(&self, group_version: &str) -> Result<bool, ClientError>;
}
