use crate::{
    label, ConfigError, DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_DURATION, DEFAULT_SAMPLE_RATE,
    DEFAULT_THREADS, JOIN_GRACE,
};
use std::time::Duration;

/// What the coordinator does with workers still running once the wait bound has elapsed.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinPolicy {
    /// Leave the workers running. They stop on their next tick since the run is finished.
    #[default]
    Detach,
    /// Cancel every remaining worker at its next await point.
    Abort,
}

/// Settings of a single benchmark run. Fixed once the run starts.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    pub name: String,
    pub tag: String,
    pub threads: usize,
    pub duration: Duration,
    pub sample_rate: f64,
    pub checkpoint_interval: u64,
    pub join_policy: JoinPolicy,
}

impl BenchConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tag: String::new(),
            threads: DEFAULT_THREADS,
            duration: DEFAULT_DURATION,
            sample_rate: DEFAULT_SAMPLE_RATE,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            join_policy: JoinPolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }

        // NOTE: Written so that NaN is rejected as well
        if !(0. ..=1.).contains(&self.sample_rate) {
            return Err(ConfigError::SampleRateOutOfRange(self.sample_rate));
        }

        if self.checkpoint_interval == 0 {
            return Err(ConfigError::NoCheckpointInterval);
        }

        Ok(())
    }

    /// Name used in report titles: `name [tag]`, or just `name` when untagged.
    pub fn label(&self) -> String {
        label(&self.name, &self.tag)
    }

    /// Run duration in milliseconds, saturating at `u64::MAX`.
    pub fn duration_millis(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }

    /// Upper bound on how long the coordinator waits for its workers.
    pub fn join_timeout(&self) -> Duration {
        self.duration.saturating_add(JOIN_GRACE)
    }
}
