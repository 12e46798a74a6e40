use std::time::Duration;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// How many replication batches per second are sent for owned entities.
    /// Values are clamped to `MIN_REPLICATION_RATE..=MAX_REPLICATION_RATE`.
    pub replication_rate: f32,
}

impl ClientConfig {
    pub const MIN_REPLICATION_RATE: f32 = 1.0;
    pub const MAX_REPLICATION_RATE: f32 = 60.0;

    pub fn with_replication_rate(replication_rate: f32) -> Self {
        Self { replication_rate }
    }

    /// Rate actually used, in batches per second
    pub fn effective_replication_rate(&self) -> f32 {
        if self.replication_rate.is_nan() {
            return Self::MIN_REPLICATION_RATE;
        }
        self.replication_rate
            .clamp(Self::MIN_REPLICATION_RATE, Self::MAX_REPLICATION_RATE)
    }

    pub fn replication_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.effective_replication_rate()))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            replication_rate: 10.0,
        }
    }
}
