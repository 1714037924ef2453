use rand::{rngs::SmallRng, Rng, SeedableRng};
use stampede::prelude::*;
use std::cell::RefCell;
use std::time::Duration;
use tracing_subscriber::FmtSubscriber;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
}

#[tokio::main]
async fn main() {
    FmtSubscriber::builder()
        .with_env_filter("stampede=debug")
        .init();

    let summary = flaky_service()
        .threads(8)
        .duration(Duration::from_secs(10))
        .sample_rate(0.05)
        .checkpoint_interval(1_000)
        .join_policy(JoinPolicy::Abort)
        .await;

    match summary {
        Ok(summary) => println!("{} of 8 workers failed", summary.failures),
        Err(err) => eprintln!("Invalid configuration: {err}"),
    }
}

#[benchmark]
async fn flaky_service() -> Result<(), anyhow::Error> {
    let (delay_us, fails) = RNG.with(|rng| {
        let mut rng = rng.borrow_mut();
        (rng.gen_range(200..2_000), rng.gen_bool(0.0002))
    });

    tokio::time::sleep(Duration::from_micros(delay_us)).await;
    if fails {
        anyhow::bail!("upstream timed out after {delay_us}us");
    }
    Ok(())
}
