use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;

/// Wall-clock time source anchored to a monotonic instant.
///
/// The epoch offset is read once, every later reading is derived from the monotonic clock, so
/// timestamps never go backwards even if the system clock is adjusted mid-run. Readings follow
/// tokio's clock, which means a paused test runtime controls them as well.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Clock {
    origin: Instant,
    origin_millis: u64,
}

impl Clock {
    pub fn new() -> Self {
        let origin_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            origin: Instant::now(),
            origin_millis,
        }
    }

    /// Milliseconds since the Unix epoch.
    pub fn now_millis(&self) -> u64 {
        self.origin_millis + self.origin.elapsed().as_millis() as u64
    }
}

/// High resolution reading used for latency measurement.
pub(crate) fn instant() -> Instant {
    Instant::now()
}

pub(crate) fn as_millis_f64(elapsed: Duration) -> f64 {
    elapsed.as_nanos() as f64 / 1e6
}
