use langop_domain::{
    Agent, ChildMeta, ContainerPort, ContainerSpec, DeploymentManifest, Kind, OwnerRef, Persona,
    Probe, RouteManifest, ServiceManifest, Tool,
};

use crate::naming::{config_name, selector_labels};
use crate::persona::persona_config;
use crate::tool::tool_sidecar_container;

const HEALTH_PATH: &str = "/healthz";
pub const AGENT_PORT: u16 = 8080;

/// An Agent's own Deployment, folding in every sidecar-mode Tool it
/// references and, when a Persona is attached, a reference to that
/// Persona's rendered ConfigObject.
pub fn agent_deployment(agent: &Agent, persona: Option<&Persona>, sidecar_tools: &[&Tool]) -> DeploymentManifest {
    let labels = selector_labels("Agent", &agent.metadata.name);

    let mut containers = vec![agent_container(agent, persona)];
    containers.extend(sidecar_tools.iter().map(|t| tool_sidecar_container(t)));

    DeploymentManifest {
        metadata: ChildMeta {
            name: config_name(&agent.metadata.name, "deployment"),
            namespace: agent.metadata.namespace.clone(),
            labels: labels.clone(),
            owner_references: vec![OwnerRef::new(Kind::Agent, &agent.metadata.key())],
        },
        replicas: agent.spec.replicas,
        selector: labels,
        containers,
    }
}

/// A Service fronting the Agent's Deployment. Always created, whether or
/// not the Agent is externally routed — a Route always targets this Service.
pub fn agent_service(agent: &Agent) -> ServiceManifest {
    ServiceManifest {
        metadata: ChildMeta {
            name: config_name(&agent.metadata.name, "svc"),
            namespace: agent.metadata.namespace.clone(),
            labels: selector_labels("Agent", &agent.metadata.name),
            owner_references: vec![OwnerRef::new(Kind::Agent, &agent.metadata.key())],
        },
        selector: selector_labels("Agent", &agent.metadata.name),
        port: AGENT_PORT,
        target_port: AGENT_PORT,
    }
}

/// A Route exposing the Agent externally, or `None` when
/// `spec.routing.expose` is false (the default).
pub fn agent_route(agent: &Agent) -> Option<RouteManifest> {
    if !agent.spec.routing.expose {
        return None;
    }

    let path_prefix = agent
        .spec
        .routing
        .path_prefix
        .clone()
        .unwrap_or_else(|| format!("/{}", agent.metadata.name));

    Some(RouteManifest {
        metadata: ChildMeta {
            name: config_name(&agent.metadata.name, "route"),
            namespace: agent.metadata.namespace.clone(),
            labels: selector_labels("Agent", &agent.metadata.name),
            owner_references: vec![OwnerRef::new(Kind::Agent, &agent.metadata.key())],
        },
        path_prefix,
        target_service: config_name(&agent.metadata.name, "svc"),
        target_port: AGENT_PORT,
    })
}

fn agent_container(agent: &Agent, persona: Option<&Persona>) -> ContainerSpec {
    let mut env = agent.spec.env.clone();
    env.insert("AGENT_INSTRUCTIONS".to_string(), agent.spec.instructions.clone());
    if let Some(persona) = persona {
        env.insert(
            "AGENT_PERSONA_CONFIG_REF".to_string(),
            persona_config(persona).metadata.name,
        );
    }

    let probe = Probe { path: HEALTH_PATH.to_string(), port: AGENT_PORT };
    ContainerSpec {
        name: agent.metadata.name.clone(),
        image: "langop/agent-runtime:latest".to_string(),
        env,
        ports: vec![ContainerPort { name: "main".to_string(), container_port: AGENT_PORT }],
        readiness_probe: Some(probe.clone()),
        liveness_probe: Some(probe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langop_domain::{AgentSpec, DeploymentMode, PersonaSpec, RoutingOptions, ToolSpec, ToolType};
    use std::collections::BTreeMap;

    fn agent(expose: bool, tool_refs: Vec<&str>) -> Agent {
        Agent::new(
            "default",
            "support",
            AgentSpec {
                cluster_ref: "prod".to_string(),
                persona_ref: None,
                tool_refs: tool_refs.into_iter().map(String::from).collect(),
                instructions: "be concise".to_string(),
                replicas: 1,
                env: BTreeMap::new(),
                routing: RoutingOptions { path_prefix: None, expose },
            },
        )
    }

    fn sidecar_tool(name: &str) -> Tool {
        Tool::new(
            "default",
            name,
            ToolSpec {
                cluster_ref: "prod".to_string(),
                tool_type: ToolType::Shell,
                image: "shell:latest".to_string(),
                deployment_mode: DeploymentMode::Sidecar,
                port: 9000,
                replicas: 1,
                env: BTreeMap::new(),
            },
        )
    }

    #[test]
    fn deployment_includes_sidecar_tool_containers() {
        let a = agent(false, vec!["shell"]);
        let tool = sidecar_tool("shell");
        let deployment = agent_deployment(&a, None, &[&tool]);
        assert_eq!(deployment.containers.len(), 2);
        assert_eq!(deployment.containers[1].name, "tool-shell");
    }

    #[test]
    fn route_absent_unless_exposed() {
        let a = agent(false, vec![]);
        assert!(agent_route(&a).is_none());
    }

    #[test]
    fn route_present_when_exposed_defaults_path_to_agent_name() {
        let a = agent(true, vec![]);
        let route = agent_route(&a).unwrap();
        assert_eq!(route.path_prefix, "/support");
        assert_eq!(route.target_service, "support-svc");
    }

    #[test]
    fn persona_wires_config_ref_into_env() {
        let a = agent(false, vec![]);
        let persona = Persona::new(
            "default",
            "friendly",
            PersonaSpec {
                display_name: "Friendly".to_string(),
                description: "d".to_string(),
                system_prompt: "be kind".to_string(),
                tone: None,
                language: None,
                instructions: vec![],
            },
        );
        let deployment = agent_deployment(&a, Some(&persona), &[]);
        assert_eq!(
            deployment.containers[0].env.get("AGENT_PERSONA_CONFIG_REF"),
            Some(&"friendly-config".to_string())
        );
    }
}
