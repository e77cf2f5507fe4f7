use std::time::Duration;

/// What the dispatcher should do after a single reconcile invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    pub requeue: bool,
    pub requeue_after: Option<Duration>,
}

impl ReconcileOutcome {
    /// Nothing further to do until the next watch event.
    pub fn done() -> Self {
        Self { requeue: false, requeue_after: None }
    }

    /// Requeue immediately (e.g. right after adding a finalizer, so the
    /// reconcile continues against the generation that now carries it).
    pub fn requeue_now() -> Self {
        Self { requeue: true, requeue_after: None }
    }

    /// Requeue after a fixed delay (e.g. waiting on cascade-deleted
    /// dependents to finish tearing down).
    pub fn requeue_after(delay: Duration) -> Self {
        Self { requeue: true, requeue_after: Some(delay) }
    }
}
