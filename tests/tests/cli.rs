#[allow(unused)]
use utils::*;

use clap::Parser;
use stampede::prelude::*;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "search-bench")]
struct Cli {
    #[command(flatten)]
    bench: BenchArgs,

    /// Query to run on every iteration
    #[arg(short = 'q', long, default_value = "by_name")]
    query: String,
}

#[benchmark]
async fn lookup() -> Result<(), anyhow::Error> {
    tokio::task::yield_now().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn args_configure_the_run() {
    let cli = Cli::try_parse_from([
        "search-bench",
        "--threads",
        "2",
        "--duration",
        "0",
        "--tag",
        "cli",
        "--sampleRate",
        "1",
        "-q",
        "by_geo",
    ])
    .unwrap();
    assert_eq!(cli.query, "by_geo");

    let recorder = Arc::new(Recorder::default());
    let summary = cli
        .bench
        .apply(lookup())
        .reporter(recorder.clone())
        .await
        .unwrap();

    assert_eq!(summary.threads, 2);
    assert_eq!(summary.tag, "cli");
    assert_eq!(
        *recorder.started.lock().unwrap(),
        vec![("lookup [cli]".to_string(), 2)]
    );

    // A zero duration ends the run at the first checkpoint.
    assert!(summary.ticks >= 5_000, "ticks {}", summary.ticks);
    assert!(recorder.checkpoint_ticks().is_empty());
    assert!(summary.latency.count > 0);
}

#[test]
fn help_lists_bench_options() {
    let err = Cli::try_parse_from(["search-bench", "--help"]).unwrap_err();
    let help = err.to_string();

    for flag in ["--threads", "--duration", "--tag", "--sample-rate", "--query"] {
        assert!(help.contains(flag), "missing {flag} in:\n{help}");
    }
}

#[test]
fn rejects_invalid_values() {
    assert!(Cli::try_parse_from(["search-bench", "-d", "-1"]).is_err());
    assert!(Cli::try_parse_from(["search-bench", "-s", "often"]).is_err());
}
