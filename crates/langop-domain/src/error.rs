use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid resource name: {0}")]
    InvalidName(String),

    #[error("invalid port {0}: must be in 1..=65535")]
    InvalidPort(u32),

    #[error("invalid tool type: {0}")]
    InvalidToolType(String),

    #[error("invalid deployment mode: {0}")]
    InvalidDeploymentMode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
