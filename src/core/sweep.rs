use crate::core::classify::classify;
use crate::core::report::{render_alert, ALERT_SUBJECT};
use crate::core::{
    ConfigProvider, Notifier, Observation, PageFetcher, StateStore, StatusChange, StatusRecord,
    Sweep, SweepDelta, SweepSummary,
};
use crate::domain::model::Availability;
use crate::utils::error::Result;
use chrono::Utc;

/// One pass over the configured consulate pages: fetch and classify each,
/// diff against the stored statuses, alert and persist on change.
///
/// The notifier is optional: without Mailjet credentials the sweep still
/// runs and records state, it just cannot mail anyone.
pub struct ConsulateSweep<F, S, N, C> {
    fetcher: F,
    store: S,
    notifier: Option<N>,
    config: C,
}

impl<F, S, N, C> ConsulateSweep<F, S, N, C> {
    pub fn new(fetcher: F, store: S, notifier: Option<N>, config: C) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<F: PageFetcher, S: StateStore, N: Notifier, C: ConfigProvider> Sweep
    for ConsulateSweep<F, S, N, C>
{
    async fn observe(&self) -> Result<Vec<Observation>> {
        let mut observations = Vec::new();

        for url in self.config.urls() {
            let url = url.trim();
            if url.is_empty() {
                continue;
            }

            tracing::info!("Checking: {}", url);
            let body = match self.fetcher.fetch(url).await {
                Ok(body) => body,
                Err(e) => {
                    // A dead page must not kill the sweep; it just reads as unknown.
                    tracing::warn!("Error fetching {}: {}", url, e);
                    String::new()
                }
            };

            let status = classify(&body, self.config.extra_negative_markers());
            tracing::debug!("{} classified as {}", url, status);

            observations.push(Observation {
                url: url.to_string(),
                status,
                checked_at: Utc::now(),
            });
        }

        Ok(observations)
    }

    async fn diff(&self, observations: Vec<Observation>) -> Result<SweepDelta> {
        let mut next_state = self.store.load().await?;
        let mut changes = Vec::new();

        for obs in &observations {
            let previous = next_state
                .get(&obs.url)
                .map(|record| record.status)
                .unwrap_or(Availability::Unknown);

            if previous != obs.status {
                changes.push(StatusChange {
                    url: obs.url.clone(),
                    previous,
                    current: obs.status,
                });
            }

            next_state.insert(
                obs.url.clone(),
                StatusRecord {
                    status: obs.status,
                    checked_at: obs.checked_at,
                },
            );
        }

        Ok(SweepDelta {
            observations,
            changes,
            next_state,
        })
    }

    async fn report(&self, delta: SweepDelta) -> Result<SweepSummary> {
        let urls_checked = delta.observations.len();

        if delta.changes.is_empty() {
            tracing::info!("No changes across {} pages", urls_checked);
            return Ok(SweepSummary {
                urls_checked,
                changes: 0,
                alert_sent: false,
            });
        }

        let checked_at = delta
            .observations
            .iter()
            .map(|obs| obs.checked_at)
            .max()
            .unwrap_or_else(Utc::now);
        let body = render_alert(&delta.changes, checked_at);

        let alert_sent = match &self.notifier {
            Some(notifier) => match notifier.send(ALERT_SUBJECT, &body).await {
                Ok(()) => {
                    tracing::info!("Alert sent for {} changed pages", delta.changes.len());
                    true
                }
                Err(e) => {
                    tracing::error!("Alert NOT sent: {}", e);
                    false
                }
            },
            None => {
                tracing::warn!("Mailjet not fully configured, skipping alert");
                false
            }
        };

        // Persist even when the send failed: the change was observed, and
        // re-alerting on every run for a status that already flipped would
        // be worse than one missed mail.
        self.store.save(&delta.next_state).await?;

        Ok(SweepSummary {
            urls_checked,
            changes: delta.changes.len(),
            alert_sent,
        })
    }
}
