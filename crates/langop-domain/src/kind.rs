use serde::{Deserialize, Serialize};

/// Every object kind the engine either watches (parent kinds) or creates
/// and owns (child kinds), all addressed through the same
/// [`crate::client::OrchestratorClient`] contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Kind {
    Cluster,
    Agent,
    Tool,
    Persona,
    Deployment,
    Service,
    ConfigObject,
    Route,
}

impl Kind {
    /// Whether this is one of the four declarative parent kinds the engine
    /// reconciles, as opposed to a child object kind it only creates.
    pub fn is_parent(&self) -> bool {
        matches!(self, Kind::Cluster | Kind::Agent | Kind::Tool | Kind::Persona)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Kind::Cluster => "Cluster",
            Kind::Agent => "Agent",
            Kind::Tool => "Tool",
            Kind::Persona => "Persona",
            Kind::Deployment => "Deployment",
            Kind::Service => "Service",
            Kind::ConfigObject => "ConfigObject",
            Kind::Route => "Route",
        };
        write!(f, "{}", s)
    }
}
