use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Phase};
use crate::metadata::ObjectMeta;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoutingOptions {
    /// Path prefix this Agent is reachable under, if routed externally.
    pub path_prefix: Option<String>,
    /// Whether a Route object should be created at all for this Agent.
    #[serde(default)]
    pub expose: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub cluster_ref: String,
    pub persona_ref: Option<String>,
    #[serde(default)]
    pub tool_refs: Vec<String>,
    pub instructions: String,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub routing: RoutingOptions,
}

fn default_replicas() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AgentStatus {
    pub observed_generation: u64,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub ready_replicas: u32,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub metadata: ObjectMeta,
    pub spec: AgentSpec,
    #[serde(default)]
    pub status: AgentStatus,
}

impl Agent {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, spec: AgentSpec) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec,
            status: AgentStatus::default(),
        }
    }
}
