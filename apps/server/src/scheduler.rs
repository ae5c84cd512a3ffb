//! Background rate refresh.
//!
//! Waits for the server to come up, optionally backfills every source to a
//! configured minimum date, then pulls the latest window on a fixed interval.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::time::{interval_at, sleep, Duration, Instant};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Initial delay before the first refresh.
const INITIAL_DELAY_SECS: u64 = 5;

/// Starts the background refresh loop.
pub fn start_rate_update_scheduler(
    state: Arc<AppState>,
    update_interval: Duration,
    min_date: Option<NaiveDate>,
) {
    tokio::spawn(async move {
        info!(
            "Rate update scheduler started ({}s interval)",
            update_interval.as_secs()
        );

        sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        if let Some(min_date) = min_date {
            run_backfill(&state, min_date).await;
        }
        run_scheduled_update(&state).await;

        let mut update_interval = interval_at(Instant::now() + update_interval, update_interval);
        loop {
            update_interval.tick().await;
            run_scheduled_update(&state).await;
        }
    });
}

async fn run_backfill(state: &AppState, min_date: NaiveDate) {
    info!("Backfilling exchange rates to {}", min_date);
    if state
        .rate_service
        .ensure_minimum_date_range(min_date, None)
        .await
    {
        info!("Backfill to {} complete", min_date);
    } else {
        warn!("Backfill to {} finished with failures", min_date);
    }
}

/// Runs a single scheduled update.
pub async fn run_scheduled_update(state: &AppState) {
    info!("Running scheduled exchange rate update...");
    let summary = state.rate_service.update_rates().await;
    if summary.is_success() {
        info!("{}", summary.summary());
    } else {
        warn!("{}", summary.summary());
        for (source, reason) in &summary.failures {
            warn!("{} update failed: {}", source, reason);
        }
    }
}
