pub mod client;
pub mod error;
pub mod fake;

pub use client::{OrchestratorClient, WatchEvent};
pub use error::ClientError;
pub use fake::FakeOrchestratorClient;
