use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::warn;

use crate::error::CacheError;

/// How long a discovery answer is trusted before it is re-probed (§4.1).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    available: bool,
    checked_at: Instant,
}

/// TTL-bounded cache of "is this API group/version available" answers.
///
/// Probing discovery on every reconcile would serialize the whole engine
/// behind the orchestrator's discovery endpoint; this cache bounds that cost
/// to once per TTL window per group/version, using the same double-checked
/// `RwLock` pattern as a hot in-memory store: most callers only ever take the
/// read lock.
///
/// A failed probe never evicts a previously cached `true`/`false` — a
/// transient discovery outage should not make every reconciler believe a
/// capability vanished.
pub struct CapabilityCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl CapabilityCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return whether `group_version` is available, probing via `probe` only
    /// when the cached answer (if any) is older than the TTL.
    pub async fn is_available<F, Fut>(
        &self,
        group_version: &str,
        probe: F,
    ) -> Result<bool, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, CacheError>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(group_version) {
                if entry.checked_at.elapsed() < self.ttl {
                    return Ok(entry.available);
                }
            }
        }

        let mut entries = self.entries.write().await;
        // Another writer may have refreshed the entry while we waited for the lock.
        if let Some(entry) = entries.get(group_version) {
            if entry.checked_at.elapsed() < self.ttl {
                return Ok(entry.available);
            }
        }

        match probe().await {
            Ok(available) => {
                entries.insert(
                    group_version.to_string(),
                    Entry { available, checked_at: Instant::now() },
                );
                Ok(available)
            }
            Err(err) => {
                if let Some(entry) = entries.get(group_version) {
                    warn!(%group_version, error = %err, "discovery probe failed, serving stale entry");
                    Ok(entry.available)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Current cached answers, for the `/status` ambient endpoint.
    pub async fn snapshot(&self) -> Vec<(String, bool)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.available))
            .collect()
    }
}

impl Default for CapabilityCache {
    fn default() -> Self {
        Self::new()
    }
}
