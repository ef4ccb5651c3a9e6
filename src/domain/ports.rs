use crate::domain::model::{Observation, StatusMap, SweepDelta, SweepSummary};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait StateStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<StatusMap>> + Send;
    fn save(
        &self,
        state: &StatusMap,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, text: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn urls(&self) -> &[String];
    fn extra_negative_markers(&self) -> &[String];
}

/// The three stages of one monitoring sweep.
#[async_trait]
pub trait Sweep: Send + Sync {
    /// Fetch and classify every configured page.
    async fn observe(&self) -> Result<Vec<Observation>>;
    /// Compare observations against the stored last-known statuses.
    async fn diff(&self, observations: Vec<Observation>) -> Result<SweepDelta>;
    /// Alert on changes and persist the new state.
    async fn report(&self, delta: SweepDelta) -> Result<SweepSummary>;
}
