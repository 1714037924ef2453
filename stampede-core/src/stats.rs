use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Throughput in ops/sec for `ticks` completed over `elapsed_ms`. A zero window yields 0.
pub fn rate(ticks: u64, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 0.;
    }
    ticks as f64 / (elapsed_ms as f64 / 1_000.)
}

/// Linear-interpolated percentile of an ascending slice.
///
/// Percentile `p` (in `0..=100`) is read at rank `p / 100 * (N - 1)`, interpolating between the
/// two neighbouring values when the rank is fractional. Returns NaN on an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (p / 100.).clamp(0., 1.) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// Name used in report titles: `name [tag]`, or just `name` when untagged.
pub fn label(name: &str, tag: &str) -> String {
    if tag.is_empty() {
        name.to_string()
    } else {
        format!("{name} [{tag}]")
    }
}

pub(crate) fn timestamp(millis: u64) -> humantime::Rfc3339Timestamp {
    humantime::format_rfc3339_millis(UNIX_EPOCH + Duration::from_millis(millis))
}

/// Latency distribution over the collected samples, in milliseconds.
///
/// All values are NaN when no samples were collected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub count: usize,
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl LatencyStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::empty();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count: sorted.len(),
            mean: statistical::mean(&sorted),
            p50: percentile(&sorted, 50.),
            p90: percentile(&sorted, 90.),
            p95: percentile(&sorted, 95.),
            p99: percentile(&sorted, 99.),
        }
    }

    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            p50: f64::NAN,
            p90: f64::NAN,
            p95: f64::NAN,
            p99: f64::NAN,
        }
    }
}

/// Interim progress, emitted every checkpoint interval while the run is live.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub label: String,
    pub ticks: u64,
    /// Throughput since the previous checkpoint
    pub window_rate: f64,
    /// Throughput since the first tick
    pub avg_rate: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}> {}: {} iterations, current rate: {:.2}ops/sec, avg. rate: {:.2}ops/sec",
            timestamp(self.timestamp_ms),
            self.label,
            self.ticks,
            self.window_rate,
            self.avg_rate,
        )
    }
}

/// Final statistics for a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub name: String,
    pub tag: String,
    pub threads: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub ticks: u64,
    pub failures: u64,
    pub avg_rate: f64,
    pub latency: LatencyStats,
}

impl Summary {
    pub fn label(&self) -> String {
        label(&self.name, &self.tag)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.end_ms.saturating_sub(self.start_ms))
    }

    pub fn ended_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.end_ms)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "-------------------------")?;
        writeln!(f, "Benchmark: {}", self.label())?;
        writeln!(f, "Threads: {}", self.threads)?;
        writeln!(
            f,
            "Ran for {}, finished at {}",
            humantime::format_duration(self.elapsed()),
            timestamp(self.end_ms),
        )?;
        writeln!(f, "Iterations: {}", self.ticks)?;
        writeln!(f, "Failures: {}", self.failures)?;
        writeln!(f, "Average rate: {:.2} ops/sec", self.avg_rate)?;
        writeln!(f)?;
        writeln!(f, "Latency ({} samples):", self.latency.count)?;
        writeln!(f, "\t- Average: {:.2}ms", self.latency.mean)?;
        writeln!(f, "\t- Median: {:.2}ms", self.latency.p50)?;
        writeln!(f, "\t- 90th Percentile: {:.2}ms", self.latency.p90)?;
        writeln!(f, "\t- 95th Percentile: {:.2}ms", self.latency.p95)?;
        write!(f, "\t- 99th Percentile: {:.2}ms", self.latency.p99)
    }
}
