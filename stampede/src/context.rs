use crate::clock::Clock;
use crate::labels::MetricLabels;
use crate::reporter::Reporter;
use metrics_util::AtomicBucket;
use stampede_core::{rate, BenchConfig, Checkpoint, ConfigError, LatencyStats, Summary};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

/// Shared state of a single benchmark run.
///
/// One instance is created per run and shared by every worker. Each call to [`RunContext::tick`]
/// records one completed unit of work; every `checkpoint_interval`-th tick the caller that
/// happens to land on it checks the run duration and either reports progress or ends the run.
///
/// The tick counter hands each post-increment value to exactly one caller, so the checkpoint
/// branch never runs twice for the same tick and the checkpoint bookkeeping needs no lock.
pub struct RunContext {
    config: BenchConfig,
    label: String,
    duration_ms: u64,
    clock: Clock,
    reporter: Arc<dyn Reporter>,
    labels: MetricLabels,

    ticks: AtomicU64,
    running: AtomicBool,
    failures: AtomicU64,
    start_ms: AtomicU64,
    end_ms: AtomicU64,
    last_checkpoint_ms: AtomicU64,
    last_checkpoint_ticks: AtomicU64,
    samples: AtomicBucket<f64>,
}

impl RunContext {
    /// Fails if `config` is invalid, so no run ever starts from a bad configuration.
    pub fn new(config: BenchConfig, reporter: Arc<dyn Reporter>) -> Result<Self, ConfigError> {
        config.validate()?;

        let clock = Clock::new();
        // NOTE: Overwritten by the first tick; this keeps a run without ticks summarizable.
        let now = clock.now_millis();

        Ok(Self {
            label: config.label(),
            duration_ms: config.duration_millis(),
            labels: MetricLabels::new(&config.name),
            config,
            clock,
            reporter,
            ticks: AtomicU64::new(0),
            running: AtomicBool::new(true),
            failures: AtomicU64::new(0),
            start_ms: AtomicU64::new(now),
            end_ms: AtomicU64::new(0),
            last_checkpoint_ms: AtomicU64::new(now),
            last_checkpoint_ticks: AtomicU64::new(0),
            samples: AtomicBucket::new(),
        })
    }

    /// Record one completed unit of work. Returns whether the caller should keep going.
    pub fn tick(&self) -> bool {
        let ticks = self.ticks.fetch_add(1, Ordering::AcqRel) + 1;

        if ticks == 1 {
            let now = self.clock.now_millis();
            self.start_ms.store(now, Ordering::Release);
            self.last_checkpoint_ms.store(now, Ordering::Release);
        }

        if ticks % self.config.checkpoint_interval == 0 {
            return self.checkpoint(ticks);
        }

        self.is_running()
    }

    fn checkpoint(&self, ticks: u64) -> bool {
        if !self.is_running() {
            return false;
        }

        let now = self.clock.now_millis();
        let start = self.start_ms.load(Ordering::Acquire);

        if start.saturating_add(self.duration_ms) <= now {
            if self.stop(now) {
                debug!("Duration elapsed at {ticks} ticks");
            }
            return false;
        }

        let last_ticks = self.last_checkpoint_ticks.load(Ordering::Acquire);
        let last_ms = self.last_checkpoint_ms.load(Ordering::Acquire);
        let window_ticks = ticks.saturating_sub(last_ticks);
        let window_rate = rate(window_ticks, now.saturating_sub(last_ms));
        let avg_rate = rate(ticks, now.saturating_sub(start));

        debug!("Checkpoint at {ticks} ticks: {window_rate:.2} ops/sec ({avg_rate:.2} avg)");
        self.labels.checkpoint(window_ticks, window_rate, avg_rate);
        self.reporter.checkpoint(&Checkpoint {
            label: self.label.clone(),
            ticks,
            window_rate,
            avg_rate,
            timestamp_ms: now,
        });

        self.last_checkpoint_ms.store(now, Ordering::Release);
        self.last_checkpoint_ticks.store(ticks, Ordering::Release);
        true
    }

    /// Flip `running` to false. Only the first caller wins and records the end time.
    fn stop(&self, now: u64) -> bool {
        let stopped = self
            .running
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if stopped {
            self.end_ms.store(now, Ordering::Release);
        }
        stopped
    }

    /// End the run if no checkpoint has done so yet. Used by the coordinator after joining.
    ///
    /// Also exports the ticks counted since the last progress report, so the exported tick total
    /// matches the summary.
    pub fn finish(&self) {
        if self.stop(self.clock.now_millis()) {
            debug!("Run ended by the coordinator before the duration elapsed");
        }

        let ticks = self.ticks();
        let reported = self.last_checkpoint_ticks.swap(ticks, Ordering::AcqRel);
        self.labels.ticks(ticks.saturating_sub(reported));
    }

    /// Record a latency observation, in milliseconds. Safe to call from any number of workers.
    pub fn add_sample(&self, latency_ms: f64) {
        self.samples.push(latency_ms);
        self.labels.sample(latency_ms);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.labels.failure();
    }

    /// Compute the run statistics. Does not consume the samples, so repeated calls on a finished
    /// run give the same result.
    pub fn summarize(&self) -> Summary {
        let start_ms = self.start_ms.load(Ordering::Acquire);
        let end_ms = self.end_ms().unwrap_or_else(|| self.clock.now_millis());
        let ticks = self.ticks();
        let samples = self.samples.data();

        Summary {
            name: self.config.name.clone(),
            tag: self.config.tag.clone(),
            threads: self.config.threads,
            start_ms,
            end_ms,
            ticks,
            failures: self.failures(),
            avg_rate: rate(ticks, end_ms.saturating_sub(start_ms)),
            latency: LatencyStats::from_samples(&samples),
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms.load(Ordering::Acquire)
    }

    /// Set once the run has stopped.
    pub fn end_ms(&self) -> Option<u64> {
        match self.end_ms.load(Ordering::Acquire) {
            0 => None,
            end => Some(end),
        }
    }

    pub fn sample_count(&self) -> usize {
        let mut count = 0;
        self.samples.data_with(|block| count += block.len());
        count
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("label", &self.label)
            .field("ticks", &self.ticks())
            .field("running", &self.is_running())
            .field("failures", &self.failures())
            .finish()
    }
}
