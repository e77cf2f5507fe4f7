use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metadata::OwnerRef;

/// Metadata carried by every child object the engine creates: name,
/// namespace, labels, and the owner back-reference to its parent (I4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub owner_references: Vec<OwnerRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPort {
    pub name: String,
    pub container_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub path: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    pub ports: Vec<ContainerPort>,
    pub readiness_probe: Option<Probe>,
    pub liveness_probe: Option<Probe>,
}

/// Desired-state manifest for a Deployment child object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub metadata: ChildMeta,
    pub replicas: u32,
    pub selector: BTreeMap<String, String>,
    pub containers: Vec<ContainerSpec>,
}

/// Observed status counters read back from a Deployment child (§4.2 phase table inputs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeploymentStatus {
    pub desired_replicas: u32,
    pub ready_replicas: u32,
    pub updated_replicas: u32,
    pub unavailable_replicas: u32,
}

/// Desired-state manifest for a Service child object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceManifest {
    pub metadata: ChildMeta,
    pub selector: BTreeMap<String, String>,
    pub port: u16,
    pub target_port: u16,
}

/// Desired-state manifest for a flat key→value ConfigObject (Persona configuration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigObjectManifest {
    pub metadata: ChildMeta,
    pub data: BTreeMap<String, String>,
}

/// Desired-state manifest for a routing rule exposing an Agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteManifest {
    pub metadata: ChildMeta,
    pub path_prefix: String,
    pub target_service: String,
    pub target_port: u16,
}
