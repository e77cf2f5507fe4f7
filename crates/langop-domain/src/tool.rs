use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Phase};
use crate::metadata::ObjectMeta;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Shell,
    Mcp,
    Http,
}

impl std::fmt::Display for ToolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolType::Shell => write!(f, "shell"),
            ToolType::Mcp => write!(f, "mcp"),
            ToolType::Http => write!(f, "http"),
        }
    }
}

/// How a Tool's workload is provisioned. Orthogonal to `tool_type` (which
/// controls *what* the tool is).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// A standalone Deployment + Service is created for this Tool.
    Service,
    /// No standalone workload; the tool is injected into its owning Agent's pod.
    Sidecar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub cluster_ref: String,
    pub tool_type: ToolType,
    pub image: String,
    pub deployment_mode: DeploymentMode,
    pub port: u16,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_replicas() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToolStatus {
    pub observed_generation: u64,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub ready_replicas: u32,
    #[serde(default)]
    pub available_replicas: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub metadata: ObjectMeta,
    pub spec: ToolSpec,
    #[serde(default)]
    pub status: ToolStatus,
}

impl Tool {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, spec: ToolSpec) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec,
            status: ToolStatus::default(),
        }
    }
}
