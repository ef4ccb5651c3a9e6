pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpPageFetcher, JsonStateFile, MailjetNotifier};
pub use config::{CliConfig, MonitorConfig};
pub use core::{engine::MonitorEngine, sweep::ConsulateSweep};
pub use utils::error::{MonitorError, Result};
