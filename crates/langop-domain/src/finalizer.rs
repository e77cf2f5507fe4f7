/// Process-wide finalizer token. Its exact value is part of the on-disk
/// contract: it is stored on every resource this engine manages, so it
/// must never change across releases (§6.3).
pub const FINALIZER: &str = "langop.io/finalizer";
