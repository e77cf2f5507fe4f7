use std::path::Path;

use langop_domain::{
    Agent, AgentSpec, Cluster, ClusterSpec, DeploymentMode, Persona, PersonaSpec, RoutingOptions,
    Tool, ToolSpec, ToolType,
};
use tracing::debug;

use crate::error::ConfigError;
use crate::raw::{RawAgent, RawCluster, RawPersona, RawTool};

/// Everything discovered under a manifest root, keyed by kind.
///
/// ```text
/// <dir>/
///   clusters/*.yaml
///   tools/*.yaml
///   agents/*.yaml
///   personas/*.yaml
/// ```
#[derive(Debug, Default)]
pub struct Manifests {
    pub clusters: Vec<Cluster>,
    pub tools: Vec<Tool>,
    pub agents: Vec<Agent>,
    pub personas: Vec<Persona>,
}

/// Load every manifest under `dir`, one subdirectory per kind.
///
/// A missing subdirectory is treated as "no resources of that kind", not
/// an error: a manifest root with only `clusters/` and `tools/` is valid.
pub fn load_manifests(dir: &Path) -> Result<Manifests, ConfigError> {
    Ok(Manifests {
        clusters: load_kind(dir, "clusters", convert_cluster)?,
        tools: load_kind(dir, "tools", convert_tool)?,
        agents: load_kind(dir, "agents", convert_agent)?,
        personas: load_kind(dir, "personas", convert_persona)?,
    })
}

fn load_kind<R, T>(
    dir: &Path,
    subdir: &str,
    convert: impl Fn(R, &Path) -> Result<T, ConfigError>,
) -> Result<Vec<T>, ConfigError>
where
    R: serde::de::DeserializeOwned,
{
    let kind_dir = dir.join(subdir);
    if !kind_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let entries = std::fs::read_dir(&kind_dir).map_err(|e| ConfigError::Io {
        path: kind_dir.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::Io {
            path: kind_dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false);
        if !path.is_file() || !is_yaml {
            continue;
        }

        debug!("loading manifest from {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let raw: R = serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.display().to_string(),
            source: e,
        })?;
        out.push(convert(raw, &path)?);
    }

    Ok(out)
}

fn convert_cluster(raw: RawCluster, _path: &Path) -> Result<Cluster, ConfigError> {
    let spec = ClusterSpec {
        routing_hint: raw.routing_hint,
        defaults: raw.defaults,
        labels: raw.labels,
        default_cloud_hint: raw.default_cloud_hint,
    };
    Ok(Cluster::new(&raw.namespace, &raw.name, spec))
}

fn convert_tool(raw: RawTool, path: &Path) -> Result<Tool, ConfigError> {
    let tool_type = parse_tool_type(&raw.tool_type, path)?;
    let deployment_mode = parse_deployment_mode(&raw.deployment_mode, path)?;

    let spec = ToolSpec {
        cluster_ref: raw.cluster_ref,
        tool_type,
        image: raw.image,
        deployment_mode,
        port: raw.port,
        replicas: raw.replicas,
        env: raw.env,
    };
    Ok(Tool::new(&raw.namespace, &raw.name, spec))
}

fn convert_agent(raw: RawAgent, _path: &Path) -> Result<Agent, ConfigError> {
    let spec = AgentSpec {
        cluster_ref: raw.cluster_ref,
        persona_ref: raw.persona_ref,
        tool_refs: raw.tool_refs,
        instructions: raw.instructions,
        replicas: raw.replicas,
        env: raw.env,
        routing: RoutingOptions {
            path_prefix: raw.routing.path_prefix,
            expose: raw.routing.expose,
        },
    };
    Ok(Agent::new(&raw.namespace, &raw.name, spec))
}

fn convert_persona(raw: RawPersona, _path: &Path) -> Result<Persona, ConfigError> {
    let spec = PersonaSpec {
        display_name: raw.display_name,
        description: raw.description,
        system_prompt: raw.system_prompt,
        tone: raw.tone,
        language: raw.language,
        instructions: raw.instructions,
    };
    Ok(Persona::new(&raw.namespace, &raw.name, spec))
}

fn parse_tool_type(s: &str, path: &Path) -> Result<ToolType, ConfigError> {
    match s {
        "shell" => Ok(ToolType::Shell),
        "mcp" => Ok(ToolType::Mcp),
        "http" => Ok(ToolType::Http),
        other => Err(ConfigError::Conversion {
            path: path.display().to_string(),
            message: format!("unknown tool type '{}'", other),
        }),
    }
}

fn parse_deployment_mode(s: &str, path: &Path) -> Result<DeploymentMode, ConfigError> {
    match s {
        "service" => Ok(DeploymentMode::Service),
        "sidecar" => Ok(DeploymentMode::Sidecar),
        other => Err(ConfigError::Conversion {
            path: path.display().to_string(),
            message: format!("unknown deployment mode '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_cluster_and_tool_from_manifest_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("clusters")).unwrap();
        fs::create_dir_all(dir.path().join("tools")).unwrap();

        fs::write(
            dir.path().join("clusters/prod.yaml"),
            "name: prod\nnamespace: default\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("tools/search.yaml"),
            "name: search\nnamespace: default\nclusterRef: prod\ntype: http\nimage: img:latest\ndeploymentMode: service\nport: 8080\n",
        )
        .unwrap();

        let manifests = load_manifests(dir.path()).unwrap();
        assert_eq!(manifests.clusters.len(), 1);
        assert_eq!(manifests.tools.len(), 1);
        assert_eq!(manifests.tools[0].spec.cluster_ref, "prod");
        assert!(manifests.agents.is_empty());
        assert!(manifests.personas.is_empty());
    }

    #[test]
    fn missing_subdirectory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifests = load_manifests(dir.path()).unwrap();
        assert!(manifests.clusters.is_empty());
    }

    #[test]
    fn unknown_tool_type_is_a_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tools")).unwrap();
        fs::write(
            dir.path().join("tools/bad.yaml"),
            "name: bad\nnamespace: default\nclusterRef: prod\ntype: carrier-pigeon\nimage: img\ndeploymentMode: service\nport: 80\n",
        )
        .unwrap();

        let err = load_manifests(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Conversion { .. }));
    }
}
