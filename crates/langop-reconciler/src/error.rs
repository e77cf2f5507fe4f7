use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("client error: {0}")]
    Client(#[from] langop_client::ClientError),

    #[error("cache error: {0}")]
    Cache(#[from] langop_cache::CacheError),

    #[error("invalid spec: {0}")]
    InvalidSpec(#[from] langop_graph::GraphError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
