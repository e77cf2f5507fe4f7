pub mod agent;
pub mod cluster;
pub mod condition;
pub mod error;
pub mod finalizer;
pub mod key;
pub mod kind;
pub mod manifest;
pub mod metadata;
pub mod persona;
pub mod tool;

pub use agent::{Agent, AgentSpec, AgentStatus, RoutingOptions};
pub use cluster::{Cluster, ClusterSpec, ClusterStatus};
pub use condition::{Condition, ConditionStatus, Phase, CONDITION_READY};
pub use error::DomainError;
pub use finalizer::FINALIZER;
pub use key::{QueueKey, ResourceKey};
pub use kind::Kind;
pub use manifest::{
    ChildMeta, ConfigObjectManifest, ContainerPort, ContainerSpec, DeploymentManifest,
    DeploymentStatus, Probe, RouteManifest, ServiceManifest,
};
pub use metadata::{ObjectMeta, OwnerRef};
pub use persona::{Persona, PersonaSpec, PersonaStatus};
pub use tool::{DeploymentMode, Tool, ToolSpec, ToolStatus, ToolType};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalizer_add_is_idempotent() {
        let mut meta = ObjectMeta::new("ns", "a");
        meta.add_finalizer(FINALIZER);
        meta.add_finalizer(FINALIZER);
        assert_eq!(meta.finalizers, vec![FINALIZER.to_string()]);
    }

    #[test]
    fn finalizer_remove_absent_is_noop() {
        let mut meta = ObjectMeta::new("ns", "a");
        meta.remove_finalizer(FINALIZER);
        assert!(meta.finalizers.is_empty());
    }

    #[test]
    fn resource_key_formats_as_namespace_slash_name() {
        let meta = ObjectMeta::new("default", "my-cluster");
        assert_eq!(meta.key().to_string(), "default/my-cluster");
    }

    #[test]
    fn is_deleting_reflects_deletion_timestamp() {
        let mut meta = ObjectMeta::new("ns", "a");
        assert!(!meta.is_deleting());
        meta.deletion_timestamp = Some(chrono::Utc::now());
        assert!(meta.is_deleting());
    }
}
