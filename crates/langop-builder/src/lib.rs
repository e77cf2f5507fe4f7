mod agent;
mod naming;
mod persona;
mod tool;

pub use agent::{agent_deployment, agent_route, agent_service, AGENT_PORT};
pub use naming::{config_name, selector_labels};
pub use persona::persona_config;
pub use tool::{tool_deployment, tool_service, tool_sidecar_container};
