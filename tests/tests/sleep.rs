#[allow(unused)]
use utils::*;

use stampede::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[benchmark]
async fn sleep_1ms() -> Result<(), anyhow::Error> {
    tokio::time::sleep(Duration::from_millis(1)).await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(10_000)]
async fn four_workers_for_two_seconds() {
    init();

    let recorder = Arc::new(Recorder::default());
    let summary = sleep_1ms()
        .threads(4)
        .duration(Duration::from_secs(2))
        .tag("e2e")
        .checkpoint_interval(500)
        .sample_rate(0.1)
        .reporter(recorder.clone())
        .await
        .unwrap();

    assert_eq!(summary, recorder.summary());
    assert_eq!(
        *recorder.started.lock().unwrap(),
        vec![("sleep_1ms [e2e]".to_string(), 4)]
    );

    assert_eq!(summary.name, "sleep_1ms");
    assert_eq!(summary.threads, 4);
    assert_eq!(summary.failures, 0);

    // The run ends at the first checkpoint after two seconds.
    let elapsed = summary.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "elapsed {elapsed:?}");

    // Every iteration takes at least 1ms, and timer resolution can stretch it to about 2ms.
    let max_ticks = 4 * elapsed.as_millis() as u64 + 500;
    assert!(summary.ticks <= max_ticks, "ticks {}", summary.ticks);
    assert!(summary.ticks >= 2_000, "ticks {}", summary.ticks);

    // Reports from different workers may interleave, but each multiple shows up exactly once.
    let mut checkpoints = recorder.checkpoint_ticks();
    checkpoints.sort_unstable();
    assert_eq!(checkpoints.first(), Some(&500));
    assert!(checkpoints.windows(2).all(|w| w[1] - w[0] == 500));

    let latency = summary.latency;
    assert!(latency.count > 0);
    assert!(latency.mean >= 1., "mean {}", latency.mean);
    assert!(latency.p50 >= 1., "p50 {}", latency.p50);
    assert!(latency.p50 < 10., "p50 {}", latency.p50);
    assert!(latency.p50 <= latency.p90);
    assert!(latency.p90 <= latency.p95);
    assert!(latency.p95 <= latency.p99);
}

#[tokio::test(start_paused = true)]
async fn summary_matches_report() {
    let recorder = Arc::new(Recorder::default());
    let summary = sleep_1ms()
        .threads(2)
        .duration(Duration::from_millis(200))
        .checkpoint_interval(50)
        .sample_rate(1.)
        .reporter(recorder.clone())
        .await
        .unwrap();

    let reported = recorder.summary();
    assert_eq!(summary, reported);
    assert_eq!(summary.to_string(), reported.to_string());
}
