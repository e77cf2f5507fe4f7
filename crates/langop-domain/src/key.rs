use serde::{Deserialize, Serialize};

use crate::kind::Kind;

/// `(namespace, name)` identity, shared by every resource kind.
///
/// Cross-resource references (`clusterRef`, `toolRefs`, `personaRef`) are
/// plain strings resolved against this identity rather than pointers — see
/// the "cyclic references resolved by naming" design note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A work queue item: which reconciler and which object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueKey {
    pub kind: Kind,
    pub key: ResourceKey,
}

impl QueueKey {
    pub fn new(kind: Kind, key: ResourceKey) -> Self {
        Self { kind, key }
    }
}

impl std::fmt::Display for QueueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.key)
    }
}
