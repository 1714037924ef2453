/// Metric names for a single benchmark, derived once from its name.
///
/// Recording is a no-op unless the `metrics` feature is enabled.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "metrics"), allow(dead_code))]
pub(crate) struct MetricLabels {
    ticks: String,
    failures: String,
    window_rate: String,
    avg_rate: String,
    latency: String,
}

impl MetricLabels {
    pub fn new(name: &str) -> Self {
        let base = format!("stampede_{name}");
        Self {
            ticks: format!("{base}_ticks"),
            failures: format!("{base}_failures"),
            window_rate: format!("{base}_window_rate"),
            avg_rate: format!("{base}_avg_rate"),
            latency: format!("{base}_latency_ms"),
        }
    }

    /// Called once per checkpoint, so the allocations for the key names stay off the per-tick path.
    pub fn checkpoint(&self, ticks_since_last: u64, window_rate: f64, avg_rate: f64) {
        self.ticks(ticks_since_last);

        #[cfg(feature = "metrics")]
        {
            metrics::gauge!(self.window_rate.clone()).set(window_rate);
            metrics::gauge!(self.avg_rate.clone()).set(avg_rate);
        }

        #[cfg(not(feature = "metrics"))]
        let _ = (window_rate, avg_rate);
    }

    pub fn ticks(&self, ticks: u64) {
        #[cfg(feature = "metrics")]
        metrics::counter!(self.ticks.clone()).increment(ticks);

        #[cfg(not(feature = "metrics"))]
        let _ = ticks;
    }

    pub fn sample(&self, latency_ms: f64) {
        #[cfg(feature = "metrics")]
        metrics::histogram!(self.latency.clone()).record(latency_ms);

        #[cfg(not(feature = "metrics"))]
        let _ = latency_ms;
    }

    pub fn failure(&self) {
        #[cfg(feature = "metrics")]
        metrics::counter!(self.failures.clone()).increment(1);
    }
}
