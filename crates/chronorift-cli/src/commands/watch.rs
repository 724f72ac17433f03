//! Periodic refresh loop.
//!
//! The core holds no wall-clock state, so refreshing is just polling it with
//! a fresh `now` on a fixed cadence.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use chronorift_core::{CoreError, CountdownTracker, Forecaster};
use tracing::debug;

use super::load_config;

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between refreshes
    #[arg(long, default_value = "1")]
    pub interval_secs: u64,
    /// Stop after this many refreshes (runs until interrupted otherwise)
    #[arg(long)]
    pub ticks: Option<u64>,
}

pub fn run(args: WatchArgs, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let forecaster = Forecaster::from_config(&config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(watch(&forecaster, &args))?;
    Ok(())
}

async fn watch(forecaster: &Forecaster, args: &WatchArgs) -> Result<(), CoreError> {
    let mut interval = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    let mut tracker = CountdownTracker::new();
    let mut ticks = 0u64;

    loop {
        interval.tick().await;
        let now = Utc::now();
        let forecast = forecaster.next_spawn(now)?;
        let countdown = tracker.update(now, forecast.boundary).to_string();
        debug!(%now, boundary = %forecast.boundary, "refresh");

        if forecast.prediction.suppressed {
            println!("{countdown:>12}  No Spawns Scheduled");
        } else {
            println!("{countdown:>12}  {}", forecast.prediction.slot);
        }

        ticks += 1;
        if args.ticks.is_some_and(|max| ticks >= max) {
            return Ok(());
        }
    }
}
