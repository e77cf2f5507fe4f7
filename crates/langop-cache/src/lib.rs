pub mod cache;
pub mod error;

pub use cache::{CapabilityCache, DEFAULT_TTL};
pub use error::CacheError;
