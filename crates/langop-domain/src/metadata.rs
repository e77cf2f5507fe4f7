use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::ResourceKey;

/// The envelope every resource kind shares: identity, generation,
/// deletion bookkeeping, and finalizer tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub namespace: String,
    pub name: String,
    /// Bumped by the orchestrator whenever `spec` changes.
    pub generation: u64,
    /// Nil unless deletion was requested.
    pub deletion_timestamp: Option<DateTime<Utc>>,
    pub finalizers: Vec<String>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            generation: 1,
            deletion_timestamp: None,
            finalizers: Vec::new(),
        }
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.namespace, &self.name)
    }

    pub fn is_deleting(&self) -> bool {
        self.deletion_timestamp.is_some()
    }

    pub fn has_finalizer(&self, token: &str) -> bool {
        self.finalizers.iter().any(|f| f == token)
    }

    /// Idempotent: adding an already-present finalizer is a no-op (I1).
    pub fn add_finalizer(&mut self, token: &str) {
        if !self.has_finalizer(token) {
            self.finalizers.push(token.to_string());
        }
    }

    /// Idempotent: removing an absent finalizer is a no-op.
    pub fn remove_finalizer(&mut self, token: &str) {
        self.finalizers.retain(|f| f != token);
    }
}

/// Metadata stamped on a child object created by a reconciler (I4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: crate::kind::Kind,
    pub namespace: String,
    pub name: String,
}

impl OwnerRef {
    pub fn new(kind: crate::kind::Kind, key: &ResourceKey) -> Self {
        Self {
            kind,
            namespace: key.namespace.clone(),
            name: key.name.clone(),
        }
    }
}
