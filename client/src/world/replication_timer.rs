use std::time::Duration;

/// Fires once every `interval` of accumulated time. Time left over when it
/// fires is dropped, so a long stall produces one batch, not a burst.
#[derive(Clone, Debug)]
pub struct ReplicationTimer {
    interval: Duration,
    elapsed: Duration,
}

impl ReplicationTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Adds `elapsed` and reports whether the interval was reached.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
