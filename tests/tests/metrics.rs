#[allow(unused)]
use utils::*;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use stampede::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

static CALLS: AtomicU64 = AtomicU64::new(0);

#[benchmark]
async fn flaky_store() -> Result<(), String> {
    let n = CALLS.fetch_add(1, Ordering::SeqCst) + 1;
    if n == 35 {
        return Err("write rejected".to_string());
    }
    Ok(())
}

// The recorder is process-global, so this binary holds a single test.
#[tokio::test]
#[ntest::timeout(5_000)]
async fn run_is_exported_as_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    assert!(recorder.install().is_ok(), "a recorder is already installed");

    let summary = flaky_store()
        .duration(Duration::from_secs(3600))
        .checkpoint_interval(10)
        .sample_rate(1.)
        .reporter(Arc::new(Recorder::default()))
        .await
        .unwrap();

    assert_eq!(summary.ticks, 34);
    assert_eq!(summary.failures, 1);

    let mut ticks = None;
    let mut failures = None;
    let mut latencies = None;
    let mut gauges = Vec::new();

    for (key, _unit, _desc, value) in snapshotter.snapshot().into_vec() {
        match (key.key().name(), value) {
            ("stampede_flaky_store_ticks", DebugValue::Counter(n)) => ticks = Some(n),
            ("stampede_flaky_store_failures", DebugValue::Counter(n)) => failures = Some(n),
            ("stampede_flaky_store_latency_ms", DebugValue::Histogram(values)) => {
                latencies = Some(values.len())
            }
            (
                name @ ("stampede_flaky_store_window_rate" | "stampede_flaky_store_avg_rate"),
                DebugValue::Gauge(_),
            ) => gauges.push(name.to_string()),
            _ => {}
        }
    }

    // 30 at the checkpoints, the last 4 when the run finishes.
    assert_eq!(ticks, Some(summary.ticks));
    assert_eq!(failures, Some(1));
    assert_eq!(latencies, Some(33));

    gauges.sort();
    assert_eq!(
        gauges,
        vec![
            "stampede_flaky_store_avg_rate".to_string(),
            "stampede_flaky_store_window_rate".to_string()
        ]
    );
}
