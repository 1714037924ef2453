use thiserror::Error;

/// Invalid benchmark configuration. Raised before any worker is started.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("At least one worker thread is required.")]
    NoThreads,

    #[error("Sample rate must be within [0, 1], got {0}")]
    SampleRateOutOfRange(f64),

    #[error("Checkpoint interval must be at least one tick.")]
    NoCheckpointInterval,
}
