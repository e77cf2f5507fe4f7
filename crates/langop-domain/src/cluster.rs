use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Phase};
use crate::metadata::ObjectMeta;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClusterSpec {
    /// Hint passed through to routing rules created for this cluster's Agents.
    pub routing_hint: Option<String>,
    /// Default values merged into Agent/Tool specs that don't override them.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    /// Labels propagated onto every child object this Cluster's Agents/Tools create.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Cloud/placement hint; absent means the platform default applies.
    pub default_cloud_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClusterStatus {
    pub observed_generation: u64,
    #[serde(default = "default_phase")]
    pub phase: Phase,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

fn default_phase() -> Phase {
    Phase::Pending
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub metadata: ObjectMeta,
    pub spec: ClusterSpec,
    #[serde(default)]
    pub status: ClusterStatus,
}

impl Cluster {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, spec: ClusterSpec) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec,
            status: ClusterStatus::default(),
        }
    }
}
