use langop_domain::{Kind, ResourceKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{kind} '{key}' references unknown cluster '{cluster_ref}'")]
    DanglingClusterRef {
        kind: Kind,
        key: ResourceKey,
        cluster_ref: String,
    },

    #[error("agent '{agent}' references unknown persona '{persona_ref}'")]
    DanglingPersonaRef {
        agent: ResourceKey,
        persona_ref: String,
    },

    #[error("agent '{agent}' references unknown tool '{tool_ref}'")]
    DanglingToolRef {
        agent: ResourceKey,
        tool_ref: String,
    },

    #[error("cycle detected in resource dependency graph")]
    CycleDetected,

    #[error("multiple errors")]
    Multiple(Vec<GraphError>),
}
