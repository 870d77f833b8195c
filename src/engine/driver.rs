//! Expiry/activation sweep driver.
//!
//! Runs on its own time-driven loop, independent of requests. Each sweep is
//! a pair of guarded UPDATEs, so redundant application (crash mid-sweep,
//! overlapping runs) settles to the same state.

use crate::db::Repository;
use crate::domain::TimeMs;
use backoff::ExponentialBackoff;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepStats {
    pub activated: u64,
    pub expired: u64,
}

pub struct SweepDriver {
    repo: Arc<Repository>,
    interval: Duration,
}

impl SweepDriver {
    pub fn new(repo: Arc<Repository>, interval: Duration) -> Self {
        Self { repo, interval }
    }

    /// One sweep: promote scheduled boosts whose window has opened, then
    /// expire active boosts whose window has closed. Activation runs first
    /// so a fully elapsed window settles to `expired` within a single sweep.
    pub async fn run_once(&self, now: TimeMs) -> Result<SweepStats, sqlx::Error> {
        let activated = self.repo.activate_due(now).await?;
        let expired = self.repo.expire_due(now).await?;
        Ok(SweepStats { activated, expired })
    }

    /// Sweep forever on the configured interval. Transient storage errors
    /// are retried with exponential backoff and never kill the loop.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let sweep = backoff::future::retry(Self::retry_policy(), || {
                let driver = self.clone();
                async move {
                    driver
                        .run_once(TimeMs::now())
                        .await
                        .map_err(backoff::Error::transient)
                }
            })
            .await;

            match sweep {
                Ok(stats) if stats.activated > 0 || stats.expired > 0 => {
                    tracing::info!(
                        activated = stats.activated,
                        expired = stats.expired,
                        "sweep applied transitions"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "sweep failed after retries");
                }
            }
        }
    }

    fn retry_policy() -> ExponentialBackoff {
        ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        }
    }
}
