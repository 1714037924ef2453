//! Benchmark builder and worker pool
use crate::context::RunContext;
use crate::reporter::{Reporter, TextReporter};
use crate::worker::WorkerHandle;
use crate::workload::{Blocking, Workload};
use futures_util::FutureExt;
use stampede_core::{BenchConfig, ConfigError, JoinPolicy, Summary};
use std::{
    any::Any,
    future::{Future, IntoFuture},
    panic::AssertUnwindSafe,
    pin::Pin,
    sync::Arc,
    time::Duration,
};
use tokio::task::JoinSet;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// Load generation run over a workload.
///
/// The workload is called in a loop by every worker; each completed call counts as one tick.
/// Workers are tasks on the runtime the benchmark is awaited on, so an async workload should not
/// block; see [`Benchmark::blocking`] for workloads that do.
/// Awaiting a `Benchmark` runs it to completion and returns its [`Summary`]. Usually created
/// with the [`#[benchmark]`](stampede_macros::benchmark) macro.
///
/// # Example
/// ```no_run
/// use stampede::prelude::*;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let summary = Benchmark::new("sleepy", || async {
///         tokio::time::sleep(Duration::from_millis(1)).await;
///         Ok::<_, std::io::Error>(())
///     })
///     .threads(4)
///     .duration(Duration::from_secs(30))
///     .await
///     .unwrap();
///
///     println!("{:.2} ops/sec", summary.avg_rate);
/// }
/// ```
pub struct Benchmark<T> {
    workload: T,
    config: BenchConfig,
    reporter: Arc<dyn Reporter>,
}

impl<T> Benchmark<T> {
    pub fn new(name: &str, workload: T) -> Self {
        Self {
            workload,
            config: BenchConfig::new(name),
            reporter: Arc::new(TextReporter::stdout()),
        }
    }

    #[doc(hidden)]
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }
}

impl<F> Benchmark<Blocking<F>> {
    /// Benchmark a synchronous workload that blocks, e.g. a call through a blocking client.
    ///
    /// Each worker gets its own thread from tokio's blocking pool, so `threads(n)` means `n`
    /// calls in flight even on a current-thread runtime.
    ///
    /// ```no_run
    /// use stampede::prelude::*;
    /// use std::time::Duration;
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() {
    ///     Benchmark::blocking("blocking_sleep", || {
    ///         std::thread::sleep(Duration::from_millis(1));
    ///         Ok::<_, std::io::Error>(())
    ///     })
    ///     .threads(4)
    ///     .await
    ///     .unwrap();
    /// }
    /// ```
    pub fn blocking(name: &str, workload: F) -> Self {
        Self::new(name, Blocking::new(workload))
    }
}

pub trait ConfigurableBenchmark:
    IntoFuture<Output = Result<Summary, ConfigError>> + Sized + Send
{
    fn threads(self, threads: usize) -> Self;
    fn duration(self, duration: Duration) -> Self;
    fn tag(self, tag: &str) -> Self;
    fn sample_rate(self, sample_rate: f64) -> Self;
    fn checkpoint_interval(self, ticks: u64) -> Self;
    fn join_policy(self, policy: JoinPolicy) -> Self;
    fn reporter(self, reporter: Arc<dyn Reporter>) -> Self;
}

impl<T: Workload> ConfigurableBenchmark for Benchmark<T> {
    /// Number of concurrent workers (default `1`).
    fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    /// How long to run for (default 60s). Checked every checkpoint, so the run overshoots by up
    /// to one checkpoint interval.
    fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Free-form tag shown next to the name in reports.
    fn tag(mut self, tag: &str) -> Self {
        self.config.tag = tag.to_string();
        self
    }

    /// Probability in `[0, 1]` that a tick is recorded as a latency sample (default `0.01`).
    fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Ticks between progress reports and duration checks (default `5000`).
    fn checkpoint_interval(mut self, ticks: u64) -> Self {
        self.config.checkpoint_interval = ticks;
        self
    }

    /// What to do with workers still busy once `duration + 1s` has passed.
    fn join_policy(mut self, policy: JoinPolicy) -> Self {
        self.config.join_policy = policy;
        self
    }

    /// Where progress and the summary are written (default stdout).
    fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }
}

impl<T: Workload> IntoFuture for Benchmark<T> {
    type Output = Result<Summary, ConfigError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(run_benchmark(self.workload, self.config, self.reporter))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerExit {
    Finished,
    Failed,
    Panicked,
}

#[instrument(name = "benchmark", skip_all, fields(name = %config.name))]
pub(crate) async fn run_benchmark<T: Workload>(
    workload: T,
    config: BenchConfig,
    reporter: Arc<dyn Reporter>,
) -> Result<Summary, ConfigError> {
    let ctx = Arc::new(RunContext::new(config.clone(), reporter.clone())?);
    info!("Running {} with config {:?}", config.name, &config);
    reporter.start(&ctx.config().label(), config.threads);

    let mut workers = JoinSet::new();
    for id in 0..config.threads {
        let handle = WorkerHandle::new(ctx.clone());
        workers.spawn(worker(id, workload.clone(), handle).in_current_span());
    }

    let timeout = config.join_timeout();
    if tokio::time::timeout(timeout, join_workers(&mut workers))
        .await
        .is_err()
    {
        warn!(
            "{} workers still running after {}; {:?}",
            workers.len(),
            humantime::format_duration(timeout),
            config.join_policy
        );

        match config.join_policy {
            JoinPolicy::Detach => workers.detach_all(),
            JoinPolicy::Abort => workers.abort_all(),
        }
    }

    ctx.finish();
    let summary = ctx.summarize();
    info!(
        "Benchmark complete: {} ticks, {} failures",
        summary.ticks, summary.failures
    );
    reporter.summary(&summary);

    Ok(summary)
}

async fn join_workers(workers: &mut JoinSet<WorkerExit>) {
    let (mut finished, mut failed) = (0, 0);
    while let Some(res) = workers.join_next().await {
        match res {
            Ok(WorkerExit::Finished) => finished += 1,
            Ok(WorkerExit::Failed | WorkerExit::Panicked) => failed += 1,
            Err(err) => error!("Worker task ended unexpectedly: {err}"),
        }
    }
    debug!("Workers joined: {finished} finished, {failed} failed");
}

async fn worker<T: Workload>(id: usize, workload: T, mut handle: WorkerHandle) -> WorkerExit {
    trace!(worker = id, "Worker started");
    loop {
        // NOTE: The call itself happens inside the async block so that a panic while building the
        // future is caught as well.
        match AssertUnwindSafe(async { workload.call().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(worker = id, "Workload failed, stopping worker: {err}");
                handle.context().record_failure();
                return WorkerExit::Failed;
            }
            Err(panic) => {
                error!(
                    worker = id,
                    "Workload panicked, stopping worker: {}",
                    panic_message(&*panic)
                );
                handle.context().record_failure();
                return WorkerExit::Panicked;
            }
        }

        if !handle.tick() {
            trace!(worker = id, "Worker finished");
            return WorkerExit::Finished;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "<non-string panic payload>"
    }
}
