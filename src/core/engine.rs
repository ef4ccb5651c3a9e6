use crate::core::Sweep;
use crate::domain::model::SweepSummary;
use crate::utils::error::Result;
use rand::Rng;
use std::time::Duration;

/// Pause before retrying after a failed sweep in watch mode.
const ERROR_RETRY: Duration = Duration::from_secs(60);

pub struct MonitorEngine<S: Sweep> {
    sweep: S,
}

impl<S: Sweep> MonitorEngine<S> {
    pub fn new(sweep: S) -> Self {
        Self { sweep }
    }

    /// One full sweep: observe, diff, report.
    pub async fn run(&self) -> Result<SweepSummary> {
        tracing::info!("Starting availability sweep");

        let observations = self.sweep.observe().await?;
        tracing::info!("Observed {} pages", observations.len());

        let delta = self.sweep.diff(observations).await?;
        tracing::info!("{} status changes", delta.changes.len());

        self.sweep.report(delta).await
    }

    /// Sweep forever, sleeping the interval (with jitter) between runs.
    /// A failed sweep is logged and retried after a short pause instead of
    /// taking the process down.
    pub async fn run_watch(&self, interval: Duration) -> Result<()> {
        loop {
            if let Err(e) = self.run().await {
                tracing::error!("Sweep failed: {}", e);
                tokio::time::sleep(ERROR_RETRY).await;
                continue;
            }

            let wait = jittered(interval);
            tracing::info!("Sleeping {}s until next sweep", wait.as_secs());
            tokio::time::sleep(wait).await;
        }
    }
}

/// Interval with a random offset of up to 10% either way, so repeated runs
/// do not hit the consulate pages on an exact clock edge.
fn jittered(interval: Duration) -> Duration {
    let base = interval.as_secs_f64();
    let jitter = base * 0.1;
    if jitter <= 0.0 {
        return interval;
    }
    let offset = rand::thread_rng().gen_range(-jitter..=jitter);
    Duration::from_secs_f64((base + offset).max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let interval = Duration::from_secs(1800);
        for _ in 0..100 {
            let wait = jittered(interval);
            assert!(wait >= Duration::from_secs(1620));
            assert!(wait <= Duration::from_secs(1980));
        }
    }

    #[test]
    fn test_jitter_of_zero_interval_is_zero() {
        assert_eq!(jittered(Duration::ZERO), Duration::ZERO);
    }
}
