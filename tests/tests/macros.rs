#[allow(unused)]
use utils::*;

use stampede::prelude::*;
use stampede::ConfigError;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

mod workloads {
    use super::*;

    /// Documentation is kept on the generated constructor.
    #[benchmark]
    pub async fn noop() -> Result<(), Infallible> {
        Ok(())
    }

    #[benchmark]
    pub async fn string_error() -> Result<(), String> {
        Err("not today".to_string())
    }
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn macro_names_the_benchmark() {
    let recorder = Arc::new(Recorder::default());
    let summary = workloads::noop()
        .duration(Duration::ZERO)
        .checkpoint_interval(100)
        .tag("macro")
        .reporter(recorder.clone())
        .await
        .unwrap();

    assert_eq!(summary.name, "noop");
    assert_eq!(summary.label(), "noop [macro]");
    assert_eq!(summary.ticks, 100);
    assert!(recorder.checkpoint_ticks().is_empty());
}

#[tokio::test]
#[ntest::timeout(5_000)]
async fn macro_keeps_error_type() {
    let summary = workloads::string_error()
        .threads(3)
        .reporter(Arc::new(Recorder::default()))
        .await
        .unwrap();

    assert_eq!(summary.name, "string_error");
    assert_eq!(summary.ticks, 0);
    assert_eq!(summary.failures, 3);
    assert!(summary.latency.p50.is_nan());
}

#[tokio::test]
async fn macro_benchmark_validates_config() {
    let err = workloads::noop()
        .sample_rate(-0.5)
        .reporter(Arc::new(Recorder::default()))
        .await
        .unwrap_err();

    assert_eq!(err, ConfigError::SampleRateOutOfRange(-0.5));
    assert_eq!(err.to_string(), "Sample rate must be within [0, 1], got -0.5");
}
