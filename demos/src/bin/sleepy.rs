use clap::Parser;
use stampede::prelude::*;
use std::time::Duration;
use tracing_subscriber::FmtSubscriber;

/// Sleep for a fixed time on every iteration, to see the harness overhead.
#[derive(Parser, Debug)]
struct Cli {
    #[command(flatten)]
    bench: BenchArgs,

    /// Time slept per iteration, in microseconds
    #[arg(short = 'u', long, default_value_t = 1_000)]
    sleep_us: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("stampede=info")
        .init();

    let cli = Cli::parse();
    let sleep = Duration::from_micros(cli.sleep_us);

    let workload = move || async move {
        tokio::time::sleep(sleep).await;
        Ok::<_, anyhow::Error>(())
    };

    let summary = cli.bench.apply(Benchmark::new("sleepy", workload)).await?;
    tracing::info!("p99 latency: {:.3}ms", summary.latency.p99);

    Ok(())
}
