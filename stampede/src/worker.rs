use crate::clock::{self, as_millis_f64};
use crate::context::RunContext;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::sync::Arc;
use tokio::time::Instant;

/// Per-worker view of a [`RunContext`].
///
/// Adds latency sampling on top of the shared tick: on each tick, with probability
/// `sample_rate`, the time since this worker's previous tick is recorded. A worker's first tick
/// has no previous tick to measure from and is never sampled.
///
/// Not shared between workers; create one per worker.
pub struct WorkerHandle {
    ctx: Arc<RunContext>,
    sample_rate: f64,
    last_tick: Option<Instant>,
    rng: SmallRng,
}

impl WorkerHandle {
    pub fn new(ctx: Arc<RunContext>) -> Self {
        Self::with_rng(ctx, SmallRng::from_entropy())
    }

    /// Use a specific random source, e.g. a seeded one for reproducible sampling.
    pub fn with_rng(ctx: Arc<RunContext>, rng: SmallRng) -> Self {
        Self {
            sample_rate: ctx.config().sample_rate,
            ctx,
            last_tick: None,
            rng,
        }
    }

    /// Record one completed unit of work. Returns whether the worker should keep going.
    pub fn tick(&mut self) -> bool {
        let now = clock::instant();

        let sampled = self.rng.gen::<f64>() <= self.sample_rate;
        if let (true, Some(last)) = (sampled, self.last_tick) {
            self.ctx.add_sample(as_millis_f64(now.duration_since(last)));
        }
        self.last_tick = Some(now);

        self.ctx.tick()
    }

    pub fn context(&self) -> &Arc<RunContext> {
        &self.ctx
    }
}
