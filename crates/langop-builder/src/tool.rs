use langop_domain::{
    ChildMeta, ContainerPort, ContainerSpec, DeploymentManifest, DeploymentMode, Kind, OwnerRef,
    Probe, ServiceManifest, Tool,
};

use crate::naming::{config_name, selector_labels};

const HEALTH_PATH: &str = "/healthz";

/// A standalone Deployment for this Tool, or `None` when it runs as a
/// sidecar inside its Agent's pod instead of its own workload (§4.3).
pub fn tool_deployment(tool: &Tool) -> Option<DeploymentManifest> {
    if tool.spec.deployment_mode == DeploymentMode::Sidecar {
        return None;
    }

    let labels = selector_labels("Tool", &tool.metadata.name);
    Some(DeploymentManifest {
        metadata: ChildMeta {
            name: config_name(&tool.metadata.name, "deployment"),
            namespace: tool.metadata.namespace.clone(),
            labels: labels.clone(),
            owner_references: vec![OwnerRef::new(Kind::Tool, &tool.metadata.key())],
        },
        replicas: tool.spec.replicas,
        selector: labels,
        containers: vec![tool_container(tool, &tool.metadata.name)],
    })
}

/// A Service fronting this Tool's Deployment, or `None` in sidecar mode.
pub fn tool_service(tool: &Tool) -> Option<ServiceManifest> {
    if tool.spec.deployment_mode == DeploymentMode::Sidecar {
        return None;
    }

    Some(ServiceManifest {
        metadata: ChildMeta {
            name: config_name(&tool.metadata.name, "svc"),
            namespace: tool.metadata.namespace.clone(),
            labels: selector_labels("Tool", &tool.metadata.name),
            owner_references: vec![OwnerRef::new(Kind::Tool, &tool.metadata.key())],
        },
        selector: selector_labels("Tool", &tool.metadata.name),
        port: tool.spec.port,
        target_port: tool.spec.port,
    })
}

/// The container spec for a sidecar-mode Tool, to be folded into its owning
/// Agent's Deployment. Factored out of [`tool_deployment`] so both paths
/// share the exact same image/env/probe construction.
pub fn tool_sidecar_container(tool: &Tool) -> ContainerSpec {
    tool_container(tool, &format!("tool-{}", tool.metadata.name))
}

fn tool_container(tool: &Tool, container_name: &str) -> ContainerSpec {
    let probe = Probe { path: HEALTH_PATH.to_string(), port: tool.spec.port };
    ContainerSpec {
        name: container_name.to_string(),
        image: tool.spec.image.clone(),
        env: tool.spec.env.clone(),
        ports: vec![ContainerPort { name: "main".to_string(), container_port: tool.spec.port }],
        readiness_probe: Some(probe.clone()),
        liveness_probe: Some(probe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langop_domain::ToolSpec;
    use langop_domain::ToolType;
    use std::collections::BTreeMap;

    fn tool(mode: DeploymentMode) -> Tool {
        Tool::new(
            "default",
            "search",
            ToolSpec {
                cluster_ref: "prod".to_string(),
                tool_type: ToolType::Http,
                image: "search:latest".to_string(),
                deployment_mode: mode,
                port: 8080,
                replicas: 2,
                env: BTreeMap::new(),
            },
        )
    }

    #[test]
    fn service_mode_produces_deployment_and_service() {
        let t = tool(DeploymentMode::Service);
        assert!(tool_deployment(&t).is_some());
        assert!(tool_service(&t).is_some());
    }

    #[test]
    fn sidecar_mode_produces_neither() {
        let t = tool(DeploymentMode::Sidecar);
        assert!(tool_deployment(&t).is_none());
        assert!(tool_service(&t).is_none());
    }

    #[test]
    fn deployment_carries_replica_count_and_owner() {
        let t = tool(DeploymentMode::Service);
        let deployment = tool_deployment(&t).unwrap();
        assert_eq!(deployment.replicas, 2);
        assert_eq!(deployment.metadata.owner_references[0].name, "search");
    }

    #[test]
    fn sidecar_container_name_is_prefixed_to_avoid_collision() {
        let t = tool(DeploymentMode::Sidecar);
        let container = tool_sidecar_container(&t);
        assert_eq!(container.name, "tool-search");
    }

    #[test]
    fn builder_is_deterministic() {
        let t = tool(DeploymentMode::Service);
        assert_eq!(tool_deployment(&t), tool_deployment(&t));
    }
}
