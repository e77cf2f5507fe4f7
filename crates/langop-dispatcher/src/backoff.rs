use std::time::Duration;

use rand::Rng;

/// Initial reconcile-retry delay on a transient failure (§5).
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
/// Ceiling on the backoff delay, regardless of attempt count (§5).
pub const MAX_BACKOFF: Duration = Duration::from_secs(300);

const JITTER_FRACTION: f64 = 0.2;

/// Exponential backoff with ±20% jitter, capped at [`MAX_BACKOFF`]. One
/// instance tracks the retry state for a single work-queue key; `reset` on
/// every successful reconcile.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backoff {
    attempt: u32,
}

impl Backoff {
    pub fn new() -> Self {
        Self { attempt: 0 }
    }

    /// The delay before the next retry, advancing the internal attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        let exponent = self.attempt;
        self.attempt = self.attempt.saturating_add(1);

        let base = INITIAL_BACKOFF.as_secs_f64() * 2f64.powi(exponent as i32);
        let capped = base.min(MAX_BACKOFF.as_secs_f64());
        let jitter = rand::thread_rng().gen_range(-JITTER_FRACTION..=JITTER_FRACTION);
        let jittered = (capped * (1.0 + jitter)).max(0.0);
        Duration::from_secs_f64(jittered)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delay_is_near_initial_backoff() {
        let mut backoff = Backoff::new();
        let delay = backoff.next_delay();
        assert!(delay >= Duration::from_millis(800));
        assert!(delay <= Duration::from_millis(1200));
    }

    #[test]
    fn delay_grows_exponentially_before_the_cap() {
        let mut backoff = Backoff::new();
        let _ = backoff.next_delay(); // ~1s
        let second = backoff.next_delay();
        assert!(second >= Duration::from_millis(1600));
        assert!(second <= Duration::from_millis(2400));
    }

    #[test]
    fn delay_never_exceeds_jittered_cap() {
        let mut backoff = Backoff::new();
        for _ in 0..20 {
            let delay = backoff.next_delay();
            assert!(delay <= MAX_BACKOFF.mul_f64(1.2 + 0.01));
        }
    }

    #[test]
    fn reset_returns_to_initial_delay() {
        let mut backoff = Backoff::new();
        for _ in 0..5 {
            backoff.next_delay();
        }
        backoff.reset();
        let delay = backoff.next_delay();
        assert!(delay <= Duration::from_millis(1200));
    }
}
