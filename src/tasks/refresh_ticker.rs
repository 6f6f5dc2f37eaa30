//! Periodic refresh background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that reconciles every timer at the display refresh cadence.
///
/// Values never depend on this task; a late or skipped tick only delays
/// when a finished timer is recorded as completed.
pub async fn refresh_ticker_task(state: Arc<AppState>, period: Duration) {
    info!("Starting refresh ticker every {:?}", period);

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let now = state.timers.now();
        let completed = state.timers.reconcile_all(now);
        if completed > 0 {
            info!("{} timer(s) completed at {}", completed, now);
        } else {
            debug!("Refresh tick: {} timer(s), none completed", state.timers.len());
        }
    }
}
