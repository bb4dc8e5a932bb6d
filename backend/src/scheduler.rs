use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::refresh::RefreshJob;

/// Periodically rebuilds the status cache.
pub struct RefreshScheduler {
    job: Arc<RefreshJob>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(job: Arc<RefreshJob>, interval: Duration) -> Self {
        Self { job, interval }
    }

    /// Run forever. The first tick fires one interval after start, since
    /// startup performs its own refresh.
    pub async fn run(self) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Refresh scheduler started (interval: {:?})", self.interval);

        loop {
            ticker.tick().await;
            tracing::debug!("Running scheduled refresh");

            if let Err(e) = self.job.refresh().await {
                tracing::error!("Scheduled refresh failed: {}", e);
                // Keep polling; the next tick may succeed
            }
        }
    }
}
