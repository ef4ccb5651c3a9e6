// Adapters layer: concrete implementations for external systems (http pages, state file, Mailjet).

pub mod fetch;
pub mod mailjet;
pub mod state_file;

pub use fetch::HttpPageFetcher;
pub use mailjet::MailjetNotifier;
pub use state_file::JsonStateFile;
