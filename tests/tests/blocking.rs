#[allow(unused)]
use utils::*;

use stampede::prelude::*;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
#[ntest::timeout(10_000)]
async fn blocking_workers_get_their_own_threads() {
    init();

    let recorder = Arc::new(Recorder::default());
    let summary = Benchmark::blocking("blocking_sleep", || {
        std::thread::sleep(Duration::from_millis(1));
        Ok::<_, Infallible>(())
    })
    .threads(4)
    .duration(Duration::from_secs(2))
    .checkpoint_interval(500)
    .sample_rate(0.1)
    .reporter(recorder.clone())
    .await
    .unwrap();

    assert_eq!(summary, recorder.summary());
    assert_eq!(summary.failures, 0);

    let elapsed = summary.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "elapsed {elapsed:?}");

    // Close to 4 x 2000; a single thread would stay below 2000.
    let max_ticks = 4 * elapsed.as_millis() as u64 + 500;
    assert!(summary.ticks <= max_ticks, "ticks {}", summary.ticks);
    assert!(summary.ticks >= 4_000, "ticks {}", summary.ticks);

    let latency = summary.latency;
    assert!(latency.count > 0);
    assert!(latency.p50 >= 1., "p50 {}", latency.p50);
    assert!(latency.p50 < 10., "p50 {}", latency.p50);
}
