use std::collections::BTreeMap;

use serde::Deserialize;

fn default_namespace() -> String {
    "default".to_string()
}

fn default_replicas() -> u32 {
    1
}

/// Raw YAML representation of a cluster manifest (`clusters/<name>.yaml`).
#[derive(Debug, Deserialize)]
pub struct RawCluster {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default, rename = "routingHint")]
    pub routing_hint: Option<String>,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default, rename = "defaultCloudHint")]
    pub default_cloud_hint: Option<String>,
}

/// Raw YAML representation of a tool manifest (`tools/<name>.yaml`).
#[derive(Debug, Deserialize)]
pub struct RawTool {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(rename = "clusterRef")]
    pub cluster_ref: String,
    #[serde(rename = "type")]
    pub tool_type: String,
    pub image: String,
    #[serde(rename = "deploymentMode")]
    pub deployment_mode: String,
    pub port: u16,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Raw YAML representation of a routing block embedded in an agent manifest.
#[derive(Debug, Deserialize, Default)]
pub struct RawRouting {
    #[serde(default, rename = "pathPrefix")]
    pub path_prefix: Option<String>,
    #[serde(default)]
    pub expose: bool,
}

/// Raw YAML representation of an agent manifest (`agents/<name>.yaml`).
#[derive(Debug, Deserialize)]
pub struct RawAgent {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(rename = "clusterRef")]
    pub cluster_ref: String,
    #[serde(default, rename = "personaRef")]
    pub persona_ref: Option<String>,
    #[serde(default, rename = "toolRefs")]
    pub tool_refs: Vec<String>,
    pub instructions: String,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub routing: RawRouting,
}

/// Raw YAML representation of a persona manifest (`personas/<name>.yaml`).
#[derive(Debug, Deserialize)]
pub struct RawPersona {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub description: String,
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}
