//! Output sinks for checkpoint lines and run summaries
use stampede_core::{Checkpoint, Summary};
use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

/// Receives progress and results of a benchmark run.
///
/// Implementations only format and emit; nothing they do feeds back into the run.
pub trait Reporter: Send + Sync {
    /// Called once before any worker is spawned.
    fn start(&self, _label: &str, _threads: usize) {}

    /// Called by whichever worker lands on a checkpoint tick while the run is still live.
    fn checkpoint(&self, checkpoint: &Checkpoint);

    /// Called once, after the workers have been joined.
    fn summary(&self, summary: &Summary);
}

/// Line-oriented reporter writing to any [`io::Write`] sink.
///
/// # Example
/// ```no_run
/// use stampede::prelude::*;
/// use std::convert::Infallible;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     Benchmark::new("noop", || async { Ok::<_, Infallible>(()) })
///         .duration(Duration::from_secs(5))
///         .reporter(Arc::new(TextReporter::new(std::io::stderr())))
///         .await
///         .unwrap();
/// }
/// ```
pub struct TextReporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TextReporter {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    fn emit(&self, args: fmt::Arguments<'_>) {
        // NOTE: A poisoned sink is still usable; the panicking writer already lost its line.
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = out.write_fmt(args).and_then(|()| out.flush()) {
            warn!("Failed to write report: {err}");
        }
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Reporter for TextReporter {
    fn start(&self, label: &str, threads: usize) {
        self.emit(format_args!("Benchmarking {label} using {threads} threads\n"));
    }

    fn checkpoint(&self, checkpoint: &Checkpoint) {
        self.emit(format_args!("{checkpoint}\n"));
    }

    fn summary(&self, summary: &Summary) {
        self.emit(format_args!("\n\n{summary}\n\nBenchmark finished!\n"));
    }
}
