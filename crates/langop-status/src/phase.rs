use langop_domain::Phase;

/// Counters behind a workload's (Tool/Agent) phase derivation. Mirrors the
/// replica bookkeeping a Deployment-shaped child object reports back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplicaCounts {
    pub desired: u32,
    pub ready: u32,
    pub updated: u32,
    pub unavailable: u32,
}

/// Derive phase + reason for a workload-backed resource (Tool, Agent) from
/// its child Deployment's replica counters (§4.2 phase table). Phase is
/// always a projection recomputed from these counters, never stored as an
/// independent source of truth.
pub fn derive_workload_phase(counts: ReplicaCounts) -> (Phase, &'static str) {
    if counts.ready == 0 {
        if counts.unavailable >= 1 {
            return (Phase::Failed, "PodsNotReady");
        }
        return (Phase::Pending, "Pending");
    }
    if counts.unavailable >= 1 {
        return (Phase::Failed, "PodsNotReady");
    }
    if counts.updated < counts.desired {
        return (Phase::Updating, "Updating");
    }
    (Phase::Running, "ReconcileSuccess")
}

/// Derive phase + reason for a resource with no child workload of its own
/// (Cluster, Persona): ready as soon as the reconcile loop completes cleanly,
/// failed when the last reconcile produced an error.
pub fn derive_simple_phase(reconciled: bool, errored: bool) -> (Phase, &'static str) {
    if errored {
        return (Phase::Failed, "ReconcileError");
    }
    if reconciled {
        return (Phase::Ready, "Reconciled");
    }
    (Phase::Pending, "AwaitingFirstReconcile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_replicas_ready_and_current_is_running() {
        let counts = ReplicaCounts { desired: 3, ready: 3, updated: 3, unavailable: 0 };
        assert_eq!(derive_workload_phase(counts), (Phase::Running, "ReconcileSuccess"));
    }

    #[test]
    fn rollout_in_progress_is_updating() {
        let counts = ReplicaCounts { desired: 3, ready: 2, updated: 2, unavailable: 0 };
        assert_eq!(derive_workload_phase(counts), (Phase::Updating, "Updating"));
    }

    #[test]
    fn unavailable_with_no_ready_replicas_is_failed() {
        let counts = ReplicaCounts { desired: 3, ready: 0, updated: 3, unavailable: 1 };
        assert_eq!(derive_workload_phase(counts), (Phase::Failed, "PodsNotReady"));
    }

    #[test]
    fn unavailable_with_some_ready_replicas_is_still_failed() {
        let counts = ReplicaCounts { desired: 3, ready: 2, updated: 3, unavailable: 1 };
        assert_eq!(derive_workload_phase(counts), (Phase::Failed, "PodsNotReady"));
    }

    #[test]
    fn zero_desired_is_pending_not_ready() {
        let counts = ReplicaCounts { desired: 0, ready: 0, updated: 0, unavailable: 0 };
        assert_eq!(derive_workload_phase(counts), (Phase::Pending, "Pending"));
    }

    #[test]
    fn no_ready_replicas_with_an_update_in_flight_is_pending_not_updating() {
        let counts = ReplicaCounts { desired: 3, ready: 0, updated: 1, unavailable: 0 };
        assert_eq!(derive_workload_phase(counts), (Phase::Pending, "Pending"));
    }

    #[test]
    fn simple_phase_follows_reconcile_outcome() {
        assert_eq!(derive_simple_phase(false, false).0, Phase::Pending);
        assert_eq!(derive_simple_phase(true, false).0, Phase::Ready);
        assert_eq!(derive_simple_phase(true, true).0, Phase::Failed);
    }
}
