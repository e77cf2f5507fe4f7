use thiserror::Error;

/// Errors surfaced by an [`OrchestratorClient`](crate::client::OrchestratorClient).
///
/// The reconciler (§7) keys its retry/requeue decision off these variants:
/// `Transient` is requeued with backoff, `NotFound`/`Conflict` are handled
/// inline by the caller, and `Fatal`/`Internal` end the reconcile with an
/// error condition.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("resource not found")]
    NotFound,

    #[error("conflicting update (resource changed since last read)")]
    Conflict,

    #[error("transient error, safe to retry: {0}")]
    Transient(String),

    #[error("fatal error: {0}")]
    Fatal(String),

    #[error("internal client error: {0}")]
    Internal(String),
}
