pub mod classify;
pub mod engine;
pub mod report;
pub mod sweep;

pub use crate::domain::model::{
    Availability, Observation, StatusChange, StatusMap, StatusRecord, SweepDelta, SweepSummary,
};
pub use crate::domain::ports::{ConfigProvider, Notifier, PageFetcher, StateStore, Sweep};
pub use crate::utils::error::Result;
