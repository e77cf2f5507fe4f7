use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tri-state condition status, matching the standard `True | False | Unknown`
/// condition vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One entry in `status.conditions`. At most one entry exists per `type_`
/// (I3); `last_transition_time` only changes when `status` changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: ConditionStatus,
    pub reason: String,
    pub message: String,
    pub last_transition_time: DateTime<Utc>,
    /// The `metadata.generation` this condition was computed against.
    pub observed_generation: u64,
}

/// Projection of conditions and child-object counters. Never the
/// authoritative source of truth — always recomputed (I: Phase derivation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Phase {
    Pending,
    Running,
    Updating,
    Ready,
    Failed,
    Terminating,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Pending
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Pending => "Pending",
            Phase::Running => "Running",
            Phase::Updating => "Updating",
            Phase::Ready => "Ready",
            Phase::Failed => "Failed",
            Phase::Terminating => "Terminating",
        };
        write!(f, "{}", s)
    }
}

/// The one condition type this engine derives phase from.
pub const CONDITION_READY: &str = "Ready";
