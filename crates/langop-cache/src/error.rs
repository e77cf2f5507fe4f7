use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("discovery probe failed for {group_version}: {reason}")]
    ProbeFailed { group_version: String, reason: String },
}
