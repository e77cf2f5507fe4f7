mod backoff;
mod dispatcher;
mod queue;
mod router;

pub use backoff::{Backoff, INITIAL_BACKOFF, MAX_BACKOFF};
pub use dispatcher::{Dispatcher, KindConfig};
pub use queue::WorkQueue;
pub use router::route_watch_event;
