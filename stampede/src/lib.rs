#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod benchmark;
pub mod reporter;
pub mod workload;

#[cfg(feature = "cli")]
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub mod cli;

pub(crate) mod clock;
pub(crate) mod context;
pub(crate) mod labels;
pub(crate) mod worker;

pub use benchmark::{Benchmark, ConfigurableBenchmark};
pub use context::RunContext;
pub use reporter::{Reporter, TextReporter};
pub use stampede_core::{
    BenchConfig, Checkpoint, ConfigError, JoinPolicy, LatencyStats, Summary,
};
pub use stampede_macros::benchmark;
pub use worker::WorkerHandle;
pub use workload::{Blocking, Workload};

#[cfg(feature = "cli")]
pub use cli::BenchArgs;

pub mod prelude {
    pub use crate::benchmark::{Benchmark, ConfigurableBenchmark};
    pub use crate::reporter::{Reporter, TextReporter};
    pub use stampede_core::{JoinPolicy, Summary};
    pub use stampede_macros::benchmark;

    #[cfg(feature = "cli")]
    pub use crate::cli::BenchArgs;
}
