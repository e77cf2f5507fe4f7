pub mod condition;
pub mod hash;
pub mod phase;

pub use condition::{condition_status, set_condition};
pub use hash::compute_desired_hash;
pub use phase::{derive_simple_phase, derive_workload_phase, ReplicaCounts};
