use langop_client::WatchEvent;
use langop_domain::{Kind, QueueKey, ResourceKey};
use langop_graph::ClusterIndex;
use serde_json::Value;

/// Translate one watch event into the set of work-queue keys it should
/// enqueue (§4.5).
///
/// - A parent-kind event (Cluster/Agent/Tool/Persona) enqueues itself.
/// - A Cluster event additionally enqueues every Tool/Agent that names it in
///   `clusterRef`, resolved through the dispatcher's [`ClusterIndex`].
/// - A child-kind event (Deployment/Service/ConfigObject/Route) enqueues the
///   owning parent named in its `ownerReferences`, never itself — child
///   kinds are never reconciled directly.
pub fn route_watch_event(kind: Kind, event: &WatchEvent, cluster_index: &ClusterIndex) -> Vec<QueueKey> {
    let object = match event {
        WatchEvent::Added(v) | WatchEvent::Modified(v) | WatchEvent::Deleted(v) => v,
    };

    if kind.is_parent() {
        let Some(key) = object_key(object) else {
            return Vec::new();
        };
        let mut targets = vec![QueueKey::new(kind, key.clone())];
        if kind == Kind::Cluster {
            targets.extend(cluster_index.dependents_of(&key).iter().cloned());
        }
        targets
    } else {
        owner_targets(object)
    }
}

fn object_key(object: &Value) -> Option<ResourceKey> {
    let metadata = object.get("metadata")?;
    let namespace = metadata.get("namespace")?.as_str()?;
    let name = metadata.get("name")?.as_str()?;
    Some(ResourceKey::new(namespace, name))
}

fn owner_targets(object: &Value) -> Vec<QueueKey> {
    let Some(owners) = object
        .get("metadata")
        .and_then(|m| m.get("owner_references"))
        .and_then(|o| o.as_array())
    else {
        return Vec::new();
    };

    owners
        .iter()
        .filter_map(|owner| {
            let kind: Kind = serde_json::from_value(owner.get("kind")?.clone()).ok()?;
            let namespace = owner.get("namespace")?.as_str()?;
            let name = owner.get("name")?.as_str()?;
            Some(QueueKey::new(kind, ResourceKey::new(namespace, name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use langop_domain::{ChildMeta, OwnerRef};

    #[test]
    fn parent_event_enqueues_itself() {
        let object = serde_json::json!({
            "metadata": { "namespace": "default", "name": "support", "generation": 1, "finalizers": [] }
        });
        let targets = route_watch_event(Kind::Agent, &WatchEvent::Modified(object), &ClusterIndex::new());
        assert_eq!(targets, vec![QueueKey::new(Kind::Agent, ResourceKey::new("default", "support"))]);
    }

    #[test]
    fn cluster_event_also_enqueues_dependents() {
        let object = serde_json::json!({
            "metadata": { "namespace": "default", "name": "prod", "generation": 1, "finalizers": [] }
        });
        let mut index = ClusterIndex::new();
        index.insert(
            ResourceKey::new("default", "prod"),
            QueueKey::new(Kind::Tool, ResourceKey::new("default", "search")),
        );

        let targets = route_watch_event(Kind::Cluster, &WatchEvent::Modified(object), &index);
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&QueueKey::new(Kind::Cluster, ResourceKey::new("default", "prod"))));
        assert!(targets.contains(&QueueKey::new(Kind::Tool, ResourceKey::new("default", "search"))));
    }

    #[test]
    fn child_event_routes_to_owner() {
        let meta = ChildMeta {
            name: "support-deployment".to_string(),
            namespace: "default".to_string(),
            labels: Default::default(),
            owner_references: vec![OwnerRef::new(Kind::Agent, &ResourceKey::new("default", "support"))],
        };
        let object = serde_json::json!({ "metadata": meta, "spec": {} });

        let targets = route_watch_event(Kind::Deployment, &WatchEvent::Added(object), &ClusterIndex::new());
        assert_eq!(targets, vec![QueueKey::new(Kind::Agent, ResourceKey::new("default", "support"))]);
    }

    #[test]
    fn malformed_object_routes_nowhere() {
        let targets = route_watch_event(Kind::Agent, &WatchEvent::Added(serde_json::json!({})), &ClusterIndex::new());
        assert!(targets.is_empty());
    }
}
