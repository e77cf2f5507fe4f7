use std::collections::HashMap;

use langop_domain::{QueueKey, ResourceKey};

/// Secondary index: which Tool/Agent work-queue keys depend on a given
/// Cluster, so a Cluster change can be translated into "enqueue every Tool
/// and Agent that reference it" without a linear scan. Rebuilt from a full
/// List of Tools and Agents whenever the dispatcher starts or resyncs — it is
/// never itself persisted.
#[derive(Debug, Default, Clone)]
pub struct ClusterIndex {
    dependents: HashMap<ResourceKey, Vec<QueueKey>>,
}

impl ClusterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cluster_key: ResourceKey, dependent: QueueKey) {
        self.dependents.entry(cluster_key).or_default().push(dependent);
    }

    pub fn dependents_of(&self, cluster_key: &ResourceKey) -> &[QueueKey] {
        self.dependents
            .get(cluster_key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (ResourceKey, QueueKey)>) -> Self {
        let mut index = Self::new();
        for (cluster_key, dependent) in entries {
            index.insert(cluster_key, dependent);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langop_domain::Kind;

    #[test]
    fn dependents_of_unknown_cluster_is_empty() {
        let index = ClusterIndex::new();
        assert!(index.dependents_of(&ResourceKey::new("default", "missing")).is_empty());
    }

    #[test]
    fn tracks_multiple_dependents() {
        let mut index = ClusterIndex::new();
        let cluster = ResourceKey::new("default", "prod");
        index.insert(cluster.clone(), QueueKey::new(Kind::Tool, ResourceKey::new("default", "search")));
        index.insert(cluster.clone(), QueueKey::new(Kind::Agent, ResourceKey::new("default", "support")));

        assert_eq!(index.dependents_of(&cluster).len(), 2);
    }
}
