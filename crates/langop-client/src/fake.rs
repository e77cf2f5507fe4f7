use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use langop_domain::{Kind, ResourceKey};
use serde_json::Value;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::client::{OrchestratorClient, WatchEvent};
use crate::error::ClientError;

#[derive(Default)]
struct Inner {
    objects: HashMap<(Kind, ResourceKey), Value>,
    watchers: HashMap<Kind, Vec<mpsc::Sender<WatchEvent>>>,
}

/// In-memory [`OrchestratorClient`] for tests and local-dev mode.
///
/// This is a test double, not a production backend: it has no durability and
/// no real API group discovery. It is grounded on the same "synthesize
/// everything in memory, perform no real I/O" shape as a local stub driver —
/// `discover_group` always answers `true`, and every write is reflected
/// immediately to any open watch channel.
#[derive(Clone, Default)]
pub struct FakeOrchestratorClient {
    inner: Arc<RwLock<Inner>>,
}

impl FakeOrchestratorClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing `create`. Useful for test fixtures
    /// that need state to exist before a reconcile runs.
    pub async fn seed(&self, kind: Kind, key: ResourceKey, object: Value) {
        self.inner.write().await.objects.insert((kind, key), object);
    }

    async fn notify(&self, kind: Kind, event: WatchEvent) {
        let mut inner = self.inner.write().await;
        if let Some(senders) = inner.watchers.get_mut(&kind) {
            senders.retain(|tx| tx.try_send(event.clone()).is_ok() || !tx.is_closed());
        }
    }
}

#[async_trait]
impl OrchestratorClient for FakeOrchestratorClient {
    async fn get(&self, kind: Kind, key: &ResourceKey) -> Result<Option<Value>, ClientError> {
        Ok(self.inner.read().await.objects.get(&(kind, key.clone())).cloned())
    }

    async fn list(&self, kind: Kind, namespace: Option<&str>) -> Result<Vec<Value>, ClientError> {
        let inner = self.inner.read().await;
        Ok(inner
            .objects
            .iter()
            .filter(|((k, key), _)| *k == kind && namespace.map_or(true, |ns| key.namespace == ns))
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn create(&self, kind: Kind, object: Value) -> Result<Value, ClientError> {
        let key = key_of(&object)?;
        {
            let mut inner = self.inner.write().await;
            if inner.objects.contains_key(&(kind, key.clone())) {
                return Err(ClientError::Conflict);
            }
            debug!(%kind, %key, "fake client: create");
            inner.objects.insert((kind, key), object.clone());
        }
        self.notify(kind, WatchEvent::Added(object.clone())).await;
        Ok(object)
    }

    async fn update(&self, kind: Kind, key: &ResourceKey, object: Value) -> Result<Value, ClientError> {
        {
            let mut inner = self.inner.write().await;
            if !inner.objects.contains_key(&(kind, key.clone())) {
                return Err(ClientError::NotFound);
            }
            inner.objects.insert((kind, key.clone()), object.clone());
        }
        self.notify(kind, WatchEvent::Modified(object.clone())).await;
        Ok(object)
    }

    async fn update_status(
        &self,
        kind: Kind,
        key: &ResourceKey,
        status: Value,
    ) -> Result<Value, ClientError> {
        let mut inner = self.inner.write().await;
        let object = inner
            .objects
            .get_mut(&(kind, key.clone()))
            .ok_or(ClientError::NotFound)?;
        object
            .as_object_mut()
            .ok_or_else(|| ClientError::Internal("object is not a JSON object".into()))?
            .insert("status".to_string(), status);
        let updated = object.clone();
        drop(inner);
        self.notify(kind, WatchEvent::Modified(updated.clone())).await;
        Ok(updated)
    }

    async fn delete(&self, kind: Kind, key: &ResourceKey) -> Result<(), ClientError> {
        enum Outcome {
            Absent,
            SoftDeleted(Value),
            Removed(Value),
        }

        let outcome = {
            let mut inner = self.inner.write().await;
            match inner.objects.get(&(kind, key.clone())) {
                None => Outcome::Absent,
                Some(object) if has_finalizers(object) => {
                    let mut marked = object.clone();
                    marked["metadata"]["deletion_timestamp"] = serde_json::to_value(Utc::now())
                        .expect("DateTime<Utc> always serializes");
                    inner.objects.insert((kind, key.clone()), marked.clone());
                    Outcome::SoftDeleted(marked)
                }
                Some(_) => {
                    let object = inner.objects.remove(&(kind, key.clone())).expect("just matched Some");
                    Outcome::Removed(object)
                }
            }
        };

        match outcome {
            Outcome::Absent => {}
            Outcome::SoftDeleted(object) => self.notify(kind, WatchEvent::Modified(object)).await,
            Outcome::Removed(object) => self.notify(kind, WatchEvent::Deleted(object)).await,
        }
        Ok(())
    }

    async fn watch(&self, kind: Kind) -> Result<mpsc::Receiver<WatchEvent>, ClientError> {
        let (tx, rx) = mpsc::channel(64);
        self.inner.write().await.watchers.entry(kind).or_default().push(tx);
        Ok(rx)
    }

    async fn discover_group(&self, _group_version: &str) -> Result<bool, ClientError> {
        Ok(true)
    }
}

fn has_finalizers(object: &Value) -> bool {
    object
        .get("metadata")
        .and_then(|m| m.get("finalizers"))
        .and_then(|f| f.as_array())
        .is_some_and(|f| !f.is_empty())
}

fn key_of(object: &Value) -> Result<ResourceKey, ClientError> {
    let namespace = object
        .get("metadata")
        .and_then(|m| m.get("namespace"))
        .and_then(|n| n.as_str())
        .ok_or_else(|| ClientError::Internal("object missing metadata.namespace".into()))?;
    let name = object
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(|n| n.as_str())
        .ok_or_else(|| ClientError::Internal("object missing metadata.name".into()))?;
    Ok(ResourceKey::new(namespace, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(ns: &str, name: &str) -> Value {
        json!({ "metadata": { "namespace": ns, "name": name } })
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let client = FakeOrchestratorClient::new();
        let created = client.create(Kind::Cluster, obj("default", "a")).await.unwrap();
        let key = ResourceKey::new("default", "a");
        let fetched = client.get(Kind::Cluster, &key).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn create_twice_conflicts() {
        let client = FakeOrchestratorClient::new();
        client.create(Kind::Cluster, obj("default", "a")).await.unwrap();
        let err = client.create(Kind::Cluster, obj("default", "a")).await.unwrap_err();
        assert!(matches!(err, ClientError::Conflict));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let client = FakeOrchestratorClient::new();
        let key = ResourceKey::new("default", "missing");
        let err = client.update(Kind::Tool, &key, obj("default", "missing")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let client = FakeOrchestratorClient::new();
        let key = ResourceKey::new("default", "a");
        client.delete(Kind::Agent, &key).await.unwrap();
        client.create(Kind::Agent, obj("default", "a")).await.unwrap();
        client.delete(Kind::Agent, &key).await.unwrap();
        client.delete(Kind::Agent, &key).await.unwrap();
        assert!(client.get(Kind::Agent, &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn watch_observes_create_and_delete() {
        let client = FakeOrchestratorClient::new();
        let mut rx = client.watch(Kind::Persona).await.unwrap();
        client.create(Kind::Persona, obj("default", "p")).await.unwrap();
        let key = ResourceKey::new("default", "p");
        client.delete(Kind::Persona, &key).await.unwrap();

        assert!(matches!(rx.recv().await, Some(WatchEvent::Added(_))));
        assert!(matches!(rx.recv().await, Some(WatchEvent::Deleted(_))));
    }

    #[tokio::test]
    async fn list_filters_by_namespace() {
        let client = FakeOrchestratorClient::new();
        client.create(Kind::Tool, obj("a", "x")).await.unwrap();
        client.create(Kind::Tool, obj("b", "y")).await.unwrap();
        let listed = client.list(Kind::Tool, Some("a")).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn discover_group_is_always_available() {
        let client = FakeOrchestratorClient::new();
        assert!(client.discover_group("anything/v1").await.unwrap());
    }

    fn obj_with_finalizer(ns: &str, name: &str) -> Value {
        json!({ "metadata": { "namespace": ns, "name": name, "finalizers": ["langop.io/finalizer"] } })
    }

    #[tokio::test]
    async fn delete_with_finalizers_stamps_deletion_timestamp_instead_of_removing() {
        let client = FakeOrchestratorClient::new();
        let key = ResourceKey::new("default", "a");
        client.create(Kind::Cluster, obj_with_finalizer("default", "a")).await.unwrap();

        client.delete(Kind::Cluster, &key).await.unwrap();

        let stored = client.get(Kind::Cluster, &key).await.unwrap().expect("object still present");
        assert!(stored["metadata"]["deletion_timestamp"].is_string());
        assert_eq!(stored["metadata"]["finalizers"], json!(["langop.io/finalizer"]));
    }

    #[tokio::test]
    async fn delete_with_finalizers_emits_modified_not_deleted() {
        let client = FakeOrchestratorClient::new();
        let mut rx = client.watch(Kind::Cluster).await.unwrap();
        client.create(Kind::Cluster, obj_with_finalizer("default", "a")).await.unwrap();
        let key = ResourceKey::new("default", "a");

        client.delete(Kind::Cluster, &key).await.unwrap();

        assert!(matches!(rx.recv().await, Some(WatchEvent::Added(_))));
        assert!(matches!(rx.recv().await, Some(WatchEvent::Modified(_))));
    }

    #[tokio::test]
    async fn delete_with_no_finalizers_left_actually_removes_the_object() {
        let client = FakeOrchestratorClient::new();
        let key = ResourceKey::new("default", "a");
        client.create(Kind::Cluster, obj_with_finalizer("default", "a")).await.unwrap();
        client.delete(Kind::Cluster, &key).await.unwrap();

        let mut cleared = client.get(Kind::Cluster, &key).await.unwrap().unwrap();
        cleared["metadata"]["finalizers"] = json!([]);
        client.update(Kind::Cluster, &key, cleared).await.unwrap();

        client.delete(Kind::Cluster, &key).await.unwrap();

        assert!(client.get(Kind::Cluster, &key).await.unwrap().is_none());
    }
}
