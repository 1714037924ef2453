use std::time::Duration;

/// Number of ticks between two checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 5_000;

/// The default probability that a tick is recorded as a latency sample.
pub const DEFAULT_SAMPLE_RATE: f64 = 0.01;

/// The default run duration.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(60);

pub const DEFAULT_THREADS: usize = 1;

/// Extra time the coordinator waits for workers past the run duration.
pub const JOIN_GRACE: Duration = Duration::from_secs(1);
