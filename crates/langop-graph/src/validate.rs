use std::collections::HashMap;

use langop_domain::{Agent, Cluster, Kind, Persona, QueueKey, ResourceKey, Tool};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::GraphError;
use crate::index::ClusterIndex;

/// Result returned by [`validate`] on success.
#[derive(Debug)]
pub struct ResolvedGraph {
    /// Every resource in dependency order: clusters and personas before the
    /// tools/agents that reference them.
    pub topo_order: Vec<QueueKey>,
    /// Cluster → dependent Tool/Agent index, ready for the dispatcher.
    pub cluster_index: ClusterIndex,
}

/// Validate a fully-loaded manifest set (§4.5).
///
/// Checks, in order:
/// 1. Every `clusterRef` (on Tool and Agent) names a known Cluster.
/// 2. Every Agent `personaRef`, if set, names a known Persona.
/// 3. Every Agent `toolRefs` entry names a known Tool.
/// 4. The resulting dependency graph is acyclic.
pub fn validate(
    clusters: &[Cluster],
    tools: &[Tool],
    agents: &[Agent],
    personas: &[Persona],
) -> Result<ResolvedGraph, GraphError> {
    let cluster_keys: HashMap<ResourceKey, ()> =
        clusters.iter().map(|c| (c.metadata.key(), ())).collect();
    let persona_keys: HashMap<ResourceKey, ()> =
        personas.iter().map(|p| (p.metadata.key(), ())).collect();
    let tool_keys: HashMap<ResourceKey, ()> =
        tools.iter().map(|t| (t.metadata.key(), ())).collect();

    let mut errors = Vec::new();
    let mut edges: Vec<(QueueKey, QueueKey)> = Vec::new();
    let mut cluster_index = ClusterIndex::new();

    for tool in tools {
        let self_key = QueueKey::new(Kind::Tool, tool.metadata.key());
        let cluster_ref = ResourceKey::new(&tool.metadata.namespace, &tool.spec.cluster_ref);
        if !cluster_keys.contains_key(&cluster_ref) {
            errors.push(GraphError::DanglingClusterRef {
                kind: Kind::Tool,
                key: tool.metadata.key(),
                cluster_ref: tool.spec.cluster_ref.clone(),
            });
            continue;
        }
        edges.push((QueueKey::new(Kind::Cluster, cluster_ref.clone()), self_key.clone()));
        cluster_index.insert(cluster_ref, self_key);
    }

    for agent in agents {
        let self_key = QueueKey::new(Kind::Agent, agent.metadata.key());
        let cluster_ref = ResourceKey::new(&agent.metadata.namespace, &agent.spec.cluster_ref);
        let mut agent_ok = true;

        if !cluster_keys.contains_key(&cluster_ref) {
            errors.push(GraphError::DanglingClusterRef {
                kind: Kind::Agent,
                key: agent.metadata.key(),
                cluster_ref: agent.spec.cluster_ref.clone(),
            });
            agent_ok = false;
        }

        if let Some(persona_ref) = &agent.spec.persona_ref {
            let persona_key = ResourceKey::new(&agent.metadata.namespace, persona_ref);
            if !persona_keys.contains_key(&persona_key) {
                errors.push(GraphError::DanglingPersonaRef {
                    agent: agent.metadata.key(),
                    persona_ref: persona_ref.clone(),
                });
                agent_ok = false;
            } else {
                edges.push((QueueKey::new(Kind::Persona, persona_key), self_key.clone()));
            }
        }

        for tool_ref in &agent.spec.tool_refs {
            let tool_key = ResourceKey::new(&agent.metadata.namespace, tool_ref);
            if !tool_keys.contains_key(&tool_key) {
                errors.push(GraphError::DanglingToolRef {
                    agent: agent.metadata.key(),
                    tool_ref: tool_ref.clone(),
                });
                agent_ok = false;
            } else {
                edges.push((QueueKey::new(Kind::Tool, tool_key), self_key.clone()));
            }
        }

        if agent_ok {
            edges.push((QueueKey::new(Kind::Cluster, cluster_ref.clone()), self_key.clone()));
            cluster_index.insert(cluster_ref, self_key);
        }
    }

    if !errors.is_empty() {
        if errors.len() == 1 {
            return Err(errors.remove(0));
        }
        return Err(GraphError::Multiple(errors));
    }

    let mut graph: DiGraph<QueueKey, ()> = DiGraph::new();
    let mut node_map: HashMap<QueueKey, NodeIndex> = HashMap::new();

    for cluster in clusters {
        let key = QueueKey::new(Kind::Cluster, cluster.metadata.key());
        node_map.insert(key.clone(), graph.add_node(key));
    }
    for persona in personas {
        let key = QueueKey::new(Kind::Persona, persona.metadata.key());
        node_map.insert(key.clone(), graph.add_node(key));
    }
    for tool in tools {
        let key = QueueKey::new(Kind::Tool, tool.metadata.key());
        node_map.insert(key.clone(), graph.add_node(key));
    }
    for agent in agents {
        let key = QueueKey::new(Kind::Agent, agent.metadata.key());
        node_map.insert(key.clone(), graph.add_node(key));
    }

    for (from, to) in &edges {
        if let (Some(&from_idx), Some(&to_idx)) = (node_map.get(from), node_map.get(to)) {
            graph.add_edge(from_idx, to_idx, ());
        }
    }

    if is_cyclic_directed(&graph) {
        return Err(GraphError::CycleDetected);
    }

    let topo = petgraph::algo::toposort(&graph, None).map_err(|_| GraphError::CycleDetected)?;
    let topo_order = topo.into_iter().map(|idx| graph[idx].clone()).collect();

    Ok(ResolvedGraph { topo_order, cluster_index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use langop_domain::{AgentSpec, ClusterSpec, PersonaSpec, RoutingOptions, ToolSpec, ToolType, DeploymentMode};
    use std::collections::BTreeMap;

    fn cluster(name: &str) -> Cluster {
        Cluster::new("default", name, ClusterSpec::default())
    }

    fn tool(name: &str, cluster_ref: &str) -> Tool {
        Tool::new(
            "default",
            name,
            ToolSpec {
                cluster_ref: cluster_ref.to_string(),
                tool_type: ToolType::Http,
                image: "img:latest".to_string(),
                deployment_mode: DeploymentMode::Service,
                port: 8080,
                replicas: 1,
                env: BTreeMap::new(),
            },
        )
    }

    fn agent(name: &str, cluster_ref: &str, persona_ref: Option<&str>, tool_refs: Vec<&str>) -> Agent {
        Agent::new(
            "default",
            name,
            AgentSpec {
                cluster_ref: cluster_ref.to_string(),
                persona_ref: persona_ref.map(String::from),
                tool_refs: tool_refs.into_iter().map(String::from).collect(),
                instructions: "be helpful".to_string(),
                replicas: 1,
                env: BTreeMap::new(),
                routing: RoutingOptions::default(),
            },
        )
    }

    fn persona(name: &str) -> Persona {
        Persona::new(
            "default",
            name,
            PersonaSpec {
                display_name: name.to_string(),
                description: "test".to_string(),
                system_prompt: "be helpful".to_string(),
                tone: None,
                language: None,
                instructions: vec![],
            },
        )
    }

    #[test]
    fn valid_graph_passes() {
        let clusters = vec![cluster("prod")];
        let tools = vec![tool("search", "prod")];
        let agents = vec![agent("support", "prod", None, vec!["search"])];
        let result = validate(&clusters, &tools, &agents, &[]);
        assert!(result.is_ok(), "{:?}", result.err());
    }

    #[test]
    fn dangling_cluster_ref_on_tool() {
        let tools = vec![tool("search", "missing")];
        let result = validate(&[], &tools, &[], &[]);
        assert!(matches!(result, Err(GraphError::DanglingClusterRef { .. })));
    }

    #[test]
    fn dangling_persona_ref_on_agent() {
        let clusters = vec![cluster("prod")];
        let agents = vec![agent("support", "prod", Some("missing-persona"), vec![])];
        let result = validate(&clusters, &[], &agents, &[]);
        assert!(matches!(result, Err(GraphError::DanglingPersonaRef { .. })));
    }

    #[test]
    fn dangling_tool_ref_on_agent() {
        let clusters = vec![cluster("prod")];
        let agents = vec![agent("support", "prod", None, vec!["missing-tool"])];
        let result = validate(&clusters, &[], &agents, &[]);
        assert!(matches!(result, Err(GraphError::DanglingToolRef { .. })));
    }

    #[test]
    fn cluster_index_tracks_dependents() {
        let clusters = vec![cluster("prod")];
        let tools = vec![tool("search", "prod")];
        let agents = vec![agent("support", "prod", None, vec!["search"])];
        let resolved = validate(&clusters, &tools, &agents, &[]).unwrap();

        let dependents = resolved.cluster_index.dependents_of(&ResourceKey::new("default", "prod"));
        assert_eq!(dependents.len(), 2);
    }

    #[test]
    fn topo_order_puts_cluster_before_dependents() {
        let clusters = vec![cluster("prod")];
        let tools = vec![tool("search", "prod")];
        let agents = vec![agent("support", "prod", None, vec!["search"])];
        let resolved = validate(&clusters, &tools, &agents, &[]).unwrap();

        let pos_cluster = resolved.topo_order.iter().position(|k| k.kind == Kind::Cluster).unwrap();
        let pos_tool = resolved.topo_order.iter().position(|k| k.kind == Kind::Tool).unwrap();
        let pos_agent = resolved.topo_order.iter().position(|k| k.kind == Kind::Agent).unwrap();
        assert!(pos_cluster < pos_tool);
        assert!(pos_tool < pos_agent);
    }

    #[test]
    fn valid_graph_with_persona_passes() {
        let clusters = vec![cluster("prod")];
        let personas = vec![persona("friendly")];
        let agents = vec![agent("support", "prod", Some("friendly"), vec![])];
        let result = validate(&clusters, &[], &agents, &personas);
        assert!(result.is_ok(), "{:?}", result.err());
    }
}
