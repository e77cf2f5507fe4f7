mod error;
mod index;
mod validate;

pub use error::GraphError;
pub use index::ClusterIndex;
pub use validate::{validate, ResolvedGraph};
