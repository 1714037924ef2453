//! Command line arguments shared by benchmark binaries (requires `cli` feature)
use crate::benchmark::ConfigurableBenchmark;
use clap::Args;
use stampede_core::{BenchConfig, DEFAULT_DURATION, DEFAULT_SAMPLE_RATE, DEFAULT_THREADS};
use std::time::Duration;

/// Standard benchmark options, meant to be flattened into a binary's own parser next to its
/// workload-specific options.
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use stampede::prelude::*;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     bench: BenchArgs,
///
///     /// Input file to load
///     #[arg(short, long)]
///     file: String,
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let cli = Cli::parse();
///     cli.bench
///         .apply(Benchmark::new("noop", || async { Ok::<_, std::io::Error>(()) }))
///         .await
///         .unwrap();
/// }
/// ```
#[derive(Args, Debug, Clone, PartialEq)]
pub struct BenchArgs {
    /// Number of concurrent workers
    #[arg(short = 't', long, value_name = "num", default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Benchmark run duration, in seconds
    #[arg(short = 'd', long, value_name = "seconds", default_value_t = DEFAULT_DURATION.as_secs())]
    pub duration: u64,

    /// Tag this benchmark run in its reports
    #[arg(short = 'T', long, default_value = "")]
    pub tag: String,

    /// Probability that an iteration is recorded as a latency sample
    #[arg(
        short = 's',
        long,
        visible_alias = "sampleRate",
        value_name = "rate",
        default_value_t = DEFAULT_SAMPLE_RATE
    )]
    pub sample_rate: f64,
}

impl BenchArgs {
    /// Configure `bench` with these options. Range checks happen when the benchmark starts.
    pub fn apply<B: ConfigurableBenchmark>(&self, bench: B) -> B {
        bench
            .threads(self.threads)
            .duration(Duration::from_secs(self.duration))
            .tag(&self.tag)
            .sample_rate(self.sample_rate)
    }

    /// Configuration for a benchmark called `name`, for callers driving a [`crate::RunContext`]
    /// directly.
    pub fn config(&self, name: &str) -> BenchConfig {
        let mut config = BenchConfig::new(name);
        config.threads = self.threads;
        config.duration = Duration::from_secs(self.duration);
        config.tag = self.tag.clone();
        config.sample_rate = self.sample_rate;
        config
    }
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            duration: DEFAULT_DURATION.as_secs(),
            tag: String::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}
